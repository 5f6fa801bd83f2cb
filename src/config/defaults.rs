//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default places backend
pub const DEFAULT_PROVIDER: &str = "google";

/// Search strategy placeholder meaning "whatever the backend prefers"
pub const AUTO: &str = "auto";

/// Default cap on distinct type tokens queried in per-type mode
pub const DEFAULT_MAX_TYPES: usize = 3;

/// Default cap on results for a single-request search
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Search radius around a city centre in world mode (meters)
pub const DEFAULT_WORLD_RADIUS: f64 = 5_000.0;

/// Minimum population for world-mode cities
pub const DEFAULT_MIN_POPULATION: u64 = 100_000;

/// How many candidate cities to request per country
pub const DEFAULT_CITY_CANDIDATES: usize = 10;

/// Device geolocation timeout in seconds
pub const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = 10;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "trander";
