//! Discover command handler
//!
//! Runs one discovery cycle and prints the result.

use crate::city::country;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::discover::{DiscoveryRequest, Report};
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::ReportedPosition;
use crate::places::category::CategorySelection;
use crate::state::AppState;
use clap::Args;

/// Discover command arguments
#[derive(Args)]
pub struct DiscoverArgs {
    /// Explore a random city in this country (name or two-letter code)
    #[arg(long, short = 'w')]
    pub world: Option<String>,

    /// Category key to search (repeatable, e.g. catering, natural.park)
    #[arg(long, short = 'c')]
    pub category: Vec<String>,

    /// Your latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Your longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Search radius in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Places provider: google or geoapify
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Search strategy: single, per_type or auto
    #[arg(long, short = 's')]
    pub strategy: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Seed the random picks for a reproducible result
    #[arg(long)]
    pub seed: Option<u64>,

    /// Toggle the discovered place in favorites
    #[arg(long)]
    pub favorite: bool,

    /// Skip the IP lookup when no position is given
    #[arg(long)]
    pub no_ip: bool,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the discover command
pub async fn run(args: DiscoverArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let mut config = Config::load()?;
    apply_overrides(&mut config, &args)?;

    let format = args
        .format
        .clone()
        .unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let position = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let coords = Coordinates::new(lat, lng);
            coords.validate()?;
            ReportedPosition::Available(coords)
        }
        _ => ReportedPosition::unsupported(),
    };

    let keys = if args.category.is_empty() {
        config.defaults.categories.clone()
    } else {
        args.category.clone()
    };
    let selection = CategorySelection::new(keys);

    let request = match &args.world {
        Some(input) => DiscoveryRequest::world(country_code(input)?, selection),
        None => DiscoveryRequest::local(selection),
    };

    let mut state = AppState::from_config(config, position, args.seed)?;

    let discovery = match state.discover(&request).await {
        Report::Found(discovery) => discovery,
        Report::Failed { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    println!("{}", formatter.format(&discovery, state.config())?);

    if args.favorite {
        match state.toggle_current_favorite()? {
            Some(true) => eprintln!("Added to favorites"),
            Some(false) => eprintln!("Removed from favorites"),
            None => {}
        }
    }

    Ok(())
}

/// Fold command-line overrides into the loaded config
fn apply_overrides(config: &mut Config, args: &DiscoverArgs) -> Result<()> {
    if let Some(provider) = &args.provider {
        config.set("search.provider", provider)?;
    }
    if let Some(strategy) = &args.strategy {
        config.set("search.strategy", strategy)?;
    }
    if let Some(radius) = args.radius {
        if radius <= 0.0 {
            return Err(Error::InvalidRadius(format!(
                "Radius must be positive, got {}",
                radius
            )));
        }
        if args.world.is_some() {
            config.search.world_radius = radius;
        } else {
            config.search.local_radius = Some(radius);
        }
    }
    if args.no_ip {
        config.location.use_ip = false;
    }
    Ok(())
}

/// Accept a popular country's name or any two-letter code
fn country_code(input: &str) -> Result<String> {
    if let Some(found) = country::lookup(input) {
        return Ok(found.code.to_string());
    }

    let input = input.trim();
    if input.len() == 2 && input.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(input.to_uppercase());
    }

    let suggestions: Vec<&str> = country::search(input).iter().map(|c| c.name).collect();
    let hint = if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    };
    Err(Error::Config(format!("Unknown country: {}{}", input, hint)))
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:<12} {}", format.name, format.description);
    }
}
