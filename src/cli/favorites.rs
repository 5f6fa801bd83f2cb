//! Favorites command handler
//!
//! View and manage saved places.

use crate::error::Result;
use crate::favorites::FavoritesStore;
use clap::{Args, Subcommand};

/// Favorites command arguments
#[derive(Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: Option<FavoritesCommand>,
}

/// Favorites subcommands
#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List saved places
    List,
    /// Remove a saved place
    Remove {
        /// Place ID
        id: String,
    },
    /// Remove all saved places
    Clear,
}

/// Run the favorites command
pub fn run(args: FavoritesArgs) -> Result<()> {
    let mut store = FavoritesStore::load()?;

    match args.command.unwrap_or(FavoritesCommand::List) {
        FavoritesCommand::List => list_favorites(&store),
        FavoritesCommand::Remove { id } => match store.remove(&id)? {
            Some(removed) => println!("Removed {}", removed.name),
            None => {
                eprintln!("No favorite with ID: {}", id);
                std::process::exit(1);
            }
        },
        FavoritesCommand::Clear => {
            let count = store.len();
            store.clear()?;
            println!("Cleared {} favorites.", count);
        }
    }

    Ok(())
}

fn list_favorites(store: &FavoritesStore) {
    if store.is_empty() {
        println!("No favorites yet.");
        return;
    }

    println!("Favorites ({}):\n", store.len());
    for fav in store.list() {
        println!("  {} - {}", fav.name, fav.address);
        match fav.added_at {
            Some(added) => println!("    {} | saved {}\n", fav.id, added.format("%Y-%m-%d %H:%M")),
            None => println!("    {}\n", fav.id),
        }
    }
}
