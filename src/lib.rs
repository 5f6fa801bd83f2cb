//! trander: random place discovery
//!
//! A library and CLI tool that finds somewhere to go: it works out where you
//! are, searches a places service for points of interest around you (or
//! around a random city in a country of your choice) and picks one at random.
//!
//! ## Features
//!
//! - Device position with IP and fixed-default fallbacks
//! - Google Places and Geoapify backends behind one search client
//! - Single-request and per-type search strategies
//! - World mode over GeoDB Cities with an offline fallback table
//! - Favorites persisted as JSON
//! - Text, JSON, map link, Street View and share-text output
//!
//! ## Quick Start
//!
//! ```no_run
//! use trander::discover::DiscoveryRequest;
//! use trander::geo::ReportedPosition;
//! use trander::places::category::CategorySelection;
//! use trander::{AppState, Config, Coordinates};
//!
//! # async fn demo() -> trander::Result<()> {
//! let config = Config::load()?;
//! let here = ReportedPosition::Available(Coordinates::new(35.6762, 139.6503));
//! let mut state = AppState::from_config(config, here, None)?;
//!
//! let request = DiscoveryRequest::local(CategorySelection::new(["catering"]));
//! if let Some(found) = state.discover(&request).await.discovery() {
//!     println!("{} ({:.1} km)", found.place.display_name(), found.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

pub mod city;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod discover;
pub mod error;
pub mod favorites;
pub mod format;
pub mod geo;
pub mod places;
pub mod rng;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use discover::{Discovery, DiscoveryCoordinator, Report};
pub use error::{Error, Result};
pub use places::{Place, PlaceSearchClient};
pub use state::AppState;
