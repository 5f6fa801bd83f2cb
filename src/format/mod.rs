//! Output formatters
//!
//! Provides trait-based output formatting for discoveries.

pub mod json;
pub mod share;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::discover::Discovery;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a discovery
    ///
    /// # Arguments
    /// * `discovery` - The discovered place and its context
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, discovery: &Discovery, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        "streetview" => Some(Box::new(url::StreetViewFormatter)),
        "share" => Some(Box::new(share::ShareFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    let names = ["text", "json", "url", "streetview", "share"];
    names
        .iter()
        .filter_map(|name| get_formatter(name))
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("url").is_some());
        assert!(get_formatter("streetview").is_some());
        assert!(get_formatter("share").is_some());
        assert!(get_formatter("gpx").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
        assert!(get_formatter("StreetView").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 5);
        assert!(formats.iter().any(|f| f.name == "streetview"));
        assert!(formats.iter().all(|f| !f.description.is_empty()));
    }
}
