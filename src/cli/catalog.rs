//! Countries and categories listings

use crate::city::country::{self, POPULAR_COUNTRIES};
use crate::error::Result;
use crate::places::category::{self, CATEGORIES, DEFAULT_CATEGORIES, MAIN_CATEGORIES};
use clap::Args;

/// Countries command arguments
#[derive(Args)]
pub struct CountriesArgs {
    /// Part of a country name; lists all countries when omitted
    pub query: Option<String>,
}

/// Categories command arguments
#[derive(Args)]
pub struct CategoriesArgs {
    /// Include subcategories
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Run the countries command
pub fn countries(args: CountriesArgs) -> Result<()> {
    let matches = match &args.query {
        Some(query) => country::search(query),
        None => POPULAR_COUNTRIES.to_vec(),
    };

    if matches.is_empty() {
        println!("No matching countries.");
        return Ok(());
    }

    for c in matches {
        println!("  {}  {}", c.code, c.name);
    }
    Ok(())
}

/// Run the categories command
pub fn categories(args: CategoriesArgs) -> Result<()> {
    let keys: Vec<&str> = if args.all {
        CATEGORIES.iter().map(|(key, _)| *key).collect()
    } else {
        MAIN_CATEGORIES.to_vec()
    };

    for key in keys {
        let marker = if DEFAULT_CATEGORIES.contains(&key) { " *" } else { "" };
        println!(
            "  {:<28} {}{}",
            key,
            category::label(key).unwrap_or(key),
            marker
        );
    }
    println!("\n* drawn at random when no category is given");
    Ok(())
}
