//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/trander/config.toml
//!
//! API keys may also come from the environment
//! (`TRANDER_GOOGLE_API_KEY`, `TRANDER_GEOAPIFY_API_KEY`, `TRANDER_GEODB_API_KEY`);
//! environment values win over the file and are never written back.

pub mod defaults;

use crate::constants::geo::{DEFAULT_LABEL, DEFAULT_LAT, DEFAULT_LNG};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::{Place, Provider, SearchStrategy};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for the discover command
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Places search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Defaults for the discover command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Category keys used when none are given on the command line
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Places search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Places backend: "google" or "geoapify"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// "single", "per_type", or "auto" for the backend's preference
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Max distinct type tokens queried in per-type mode
    #[serde(default = "default_max_types")]
    pub max_types: usize,

    /// Max results requested in single-request mode
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Local search radius in meters; backend default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_radius: Option<f64>,

    /// Search radius around a city centre in meters
    #[serde(default = "default_world_radius")]
    pub world_radius: f64,

    /// Minimum city population in world mode
    #[serde(default = "default_min_population")]
    pub min_population: u64,

    /// Candidate cities requested per country
    #[serde(default = "default_city_candidates")]
    pub city_candidates: usize,
}

/// Location resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fallback latitude
    #[serde(default = "default_lat")]
    pub lat: f64,

    /// Fallback longitude
    #[serde(default = "default_lng")]
    pub lng: f64,

    /// Name of the fallback location, used in notices
    #[serde(default = "default_label")]
    pub label: String,

    /// Try IP geolocation before the fallback
    #[serde(default = "default_true")]
    pub use_ip: bool,

    /// Device geolocation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Ask the device for a high-accuracy fix
    #[serde(default = "default_true")]
    pub high_accuracy: bool,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    ///
    /// Placeholders: {lat}, {lng}, {name}, {place_id}
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google Places API key
    #[serde(default)]
    pub google: String,

    /// Geoapify API key
    #[serde(default)]
    pub geoapify: String,

    /// RapidAPI key for GeoDB Cities (free service used when empty)
    #[serde(default)]
    pub geodb: String,
}

// Default value functions for serde
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}
fn default_strategy() -> String {
    AUTO.to_string()
}
fn default_max_types() -> usize {
    DEFAULT_MAX_TYPES
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_world_radius() -> f64 {
    DEFAULT_WORLD_RADIUS
}
fn default_min_population() -> u64 {
    DEFAULT_MIN_POPULATION
}
fn default_city_candidates() -> usize {
    DEFAULT_CITY_CANDIDATES
}
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lng() -> f64 {
    DEFAULT_LNG
}
fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_SECS
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={name}&query_place_id={place_id}"
            .to_string(),
    );
    providers.insert(
        "streetview".to_string(),
        "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?q={name}&ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            categories: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            strategy: default_strategy(),
            max_types: default_max_types(),
            max_results: default_max_results(),
            local_radius: None,
            world_radius: default_world_radius(),
            min_population: default_min_population(),
            city_candidates: default_city_candidates(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lng: default_lng(),
            label: default_label(),
            use_ip: true,
            timeout_secs: default_timeout(),
            high_accuracy: true,
        }
    }
}

impl LocationConfig {
    /// The fallback coordinate
    pub fn fallback(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Device geolocation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let mut config = Self::load_stored()?;
        config.apply_env();
        Ok(config)
    }

    /// Load the config file as stored, without environment overrides
    ///
    /// Use this for anything that saves the config back.
    pub fn load_stored() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load a config file, creating it with defaults when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Overlay API keys from the environment
    fn apply_env(&mut self) {
        let overlay = |target: &mut String, var: &str| {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        };
        overlay(&mut self.api_keys.google, "TRANDER_GOOGLE_API_KEY");
        overlay(&mut self.api_keys.geoapify, "TRANDER_GEOAPIFY_API_KEY");
        overlay(&mut self.api_keys.geodb, "TRANDER_GEODB_API_KEY");
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "categories"] => Some(self.defaults.categories.join(",")),

            ["search", "provider"] => Some(self.search.provider.clone()),
            ["search", "strategy"] => Some(self.search.strategy.clone()),
            ["search", "max_types"] => Some(self.search.max_types.to_string()),
            ["search", "max_results"] => Some(self.search.max_results.to_string()),
            ["search", "local_radius"] => Some(
                self.search
                    .local_radius
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| AUTO.to_string()),
            ),
            ["search", "world_radius"] => Some(self.search.world_radius.to_string()),
            ["search", "min_population"] => Some(self.search.min_population.to_string()),
            ["search", "city_candidates"] => Some(self.search.city_candidates.to_string()),

            ["location", "lat"] => Some(self.location.lat.to_string()),
            ["location", "lng"] => Some(self.location.lng.to_string()),
            ["location", "label"] => Some(self.location.label.clone()),
            ["location", "use_ip"] => Some(self.location.use_ip.to_string()),
            ["location", "timeout_secs"] => Some(self.location.timeout_secs.to_string()),
            ["location", "high_accuracy"] => Some(self.location.high_accuracy.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "google"] => Some(self.api_keys.google.clone()),
            ["api_keys", "geoapify"] => Some(self.api_keys.geoapify.clone()),
            ["api_keys", "geodb"] => Some(self.api_keys.geodb.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }
            ["defaults", "categories"] => {
                self.defaults.categories = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }

            ["search", "provider"] => {
                Provider::from_str(value).map_err(Error::Config)?;
                self.search.provider = value.to_lowercase();
            }
            ["search", "strategy"] => {
                if value != AUTO {
                    SearchStrategy::from_str(value).map_err(Error::Config)?;
                }
                self.search.strategy = value.to_lowercase();
            }
            ["search", "max_types"] => {
                self.search.max_types = parse(value, "max_types")?;
            }
            ["search", "max_results"] => {
                self.search.max_results = parse(value, "max_results")?;
            }
            ["search", "local_radius"] => {
                self.search.local_radius = if value == AUTO {
                    None
                } else {
                    Some(parse(value, "radius")?)
                };
            }
            ["search", "world_radius"] => {
                self.search.world_radius = parse(value, "radius")?;
            }
            ["search", "min_population"] => {
                self.search.min_population = parse(value, "population")?;
            }
            ["search", "city_candidates"] => {
                self.search.city_candidates = parse(value, "city_candidates")?;
            }

            ["location", "lat"] => {
                self.location.lat = parse(value, "latitude")?;
            }
            ["location", "lng"] => {
                self.location.lng = parse(value, "longitude")?;
            }
            ["location", "label"] => {
                self.location.label = value.to_string();
            }
            ["location", "use_ip"] => {
                self.location.use_ip = parse(value, "boolean")?;
            }
            ["location", "timeout_secs"] => {
                self.location.timeout_secs = parse(value, "timeout")?;
            }
            ["location", "high_accuracy"] => {
                self.location.high_accuracy = parse(value, "boolean")?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            ["api_keys", "google"] => {
                self.api_keys.google = value.to_string();
            }
            ["api_keys", "geoapify"] => {
                self.api_keys.geoapify = value.to_string();
            }
            ["api_keys", "geodb"] => {
                self.api_keys.geodb = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.format",
            "defaults.categories",
            "search.provider",
            "search.strategy",
            "search.max_types",
            "search.max_results",
            "search.local_radius",
            "search.world_radius",
            "search.min_population",
            "search.city_candidates",
            "location.lat",
            "location.lng",
            "location.label",
            "location.use_ip",
            "location.timeout_secs",
            "location.high_accuracy",
            "url.default",
            "api_keys.google",
            "api_keys.geoapify",
            "api_keys.geodb",
        ]
    }

    /// Format a map URL for a place using the specified provider
    pub fn format_url(&self, provider: Option<&str>, place: &Place) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &place.coords.lat.to_string())
            .replace("{lng}", &place.coords.lng.to_string())
            .replace("{name}", &urlencoding::encode(place.name.as_deref().unwrap_or("")))
            .replace("{place_id}", &urlencoding::encode(&place.id)))
    }
}

fn parse<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_place() -> Place {
        Place::new("ChIJ123", Coordinates::new(35.6586, 139.7454)).with_name("Tokyo Tower")
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.provider, "google");
        assert_eq!(config.search.max_types, 3);
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.search.world_radius, 5000.0);
        assert_eq!(config.location.lat, 35.6762);
        assert_eq!(config.location.lng, 139.6503);
        assert_eq!(config.location.timeout_secs, 10);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("search.provider"), Some("google".to_string()));

        config.set("search.provider", "geoapify").unwrap();
        assert_eq!(config.get("search.provider"), Some("geoapify".to_string()));

        config.set("search.max_types", "5").unwrap();
        assert_eq!(config.search.max_types, 5);
    }

    #[test]
    fn test_set_validates_search_choices() {
        let mut config = Config::default();
        assert!(config.set("search.provider", "bing").is_err());
        assert!(config.set("search.strategy", "sideways").is_err());

        config.set("search.provider", "Geoapify").unwrap();
        assert_eq!(config.search.provider, "geoapify");
        config.set("search.strategy", "per_type").unwrap();
        config.set("search.strategy", "auto").unwrap();
        assert_eq!(config.search.strategy, "auto");
    }

    #[test]
    fn test_local_radius_auto() {
        let mut config = Config::default();
        assert_eq!(config.get("search.local_radius"), Some("auto".to_string()));

        config.set("search.local_radius", "75000").unwrap();
        assert_eq!(config.search.local_radius, Some(75_000.0));

        config.set("search.local_radius", "auto").unwrap();
        assert_eq!(config.search.local_radius, None);
    }

    #[test]
    fn test_set_categories() {
        let mut config = Config::default();
        config.set("defaults.categories", "catering, natural.park,").unwrap();
        assert_eq!(config.defaults.categories, vec!["catering", "natural.park"]);
        assert_eq!(
            config.get("defaults.categories"),
            Some("catering,natural.park".to_string())
        );
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("search.world_radius", "not_a_number").is_err());
        assert!(config.set("location.use_ip", "maybe").is_err());
    }

    #[test]
    fn test_format_url_google() {
        let config = Config::default();
        let url = config.format_url(Some("google"), &sample_place()).unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=Tokyo%20Tower&query_place_id=ChIJ123"
        );
    }

    #[test]
    fn test_format_url_streetview() {
        let config = Config::default();
        let url = config.format_url(Some("streetview"), &sample_place()).unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint=35.6586,139.7454"
        );
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        assert!(config.format_url(Some("unknown"), &sample_place()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trander").join("config.toml");

        let mut config = Config::default();
        config.search.provider = "geoapify".to_string();
        config.search.world_radius = 8000.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.provider, "geoapify");
        assert_eq!(loaded.search.world_radius, 8000.0);
    }

    #[test]
    fn test_missing_file_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.provider, "google");
        assert!(path.exists());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.search.provider, "google");
        assert_eq!(loaded.search.local_radius, None);
        assert_eq!(loaded.location.label, "Tokyo");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[search]\nprovider = \"geoapify\"\n").unwrap();
        assert_eq!(loaded.search.provider, "geoapify");
        assert_eq!(loaded.search.max_results, 50);
        assert!(loaded.location.use_ip);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[location]"));
        assert!(toml.contains("[url.providers]"));
        assert!(toml.contains("[api_keys]"));
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"search.provider"));
        assert!(keys.contains(&"location.timeout_secs"));
        for key in keys {
            assert!(Config::default().get(key).is_some(), "missing getter for {}", key);
        }
    }
}
