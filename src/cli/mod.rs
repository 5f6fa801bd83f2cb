//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod catalog;
pub mod config;
pub mod discover;
pub mod favorites;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Discover a random place nearby or anywhere in the world
#[derive(Parser)]
#[command(name = "trander")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover a random place
    Discover(discover::DiscoverArgs),

    /// View and manage favorites
    Favorites(favorites::FavoritesArgs),

    /// Search the countries available for world discovery
    Countries(catalog::CountriesArgs),

    /// List place categories
    Categories(catalog::CategoriesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so formatted output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discover(args) => discover::run(args).await,
        Commands::Favorites(args) => favorites::run(args),
        Commands::Countries(args) => catalog::countries(args),
        Commands::Categories(args) => catalog::categories(args),
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_discover() {
        let cli = Cli::try_parse_from([
            "trander", "discover", "--world", "Japan", "-c", "catering", "-c", "natural.park",
            "--seed", "7",
        ])
        .unwrap();

        match cli.command {
            Commands::Discover(args) => {
                assert_eq!(args.world.as_deref(), Some("Japan"));
                assert_eq!(args.category, vec!["catering", "natural.park"]);
                assert_eq!(args.seed, Some(7));
            }
            _ => panic!("expected discover"),
        }
    }

    #[test]
    fn test_lat_requires_lng() {
        assert!(Cli::try_parse_from(["trander", "discover", "--lat", "35.0"]).is_err());
        assert!(
            Cli::try_parse_from(["trander", "discover", "--lat", "35.0", "--lng", "139.0"]).is_ok()
        );
    }
}
