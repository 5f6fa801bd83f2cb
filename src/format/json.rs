//! JSON output formatter

use crate::config::Config;
use crate::discover::Discovery;
use crate::error::Result;
use crate::format::OutputFormatter;

/// JSON formatter - outputs the full discovery as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON discovery"
    }

    fn format(&self, discovery: &Discovery, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(discovery)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&fixtures::world(), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["place"]["name"], "Senso-ji");
        assert_eq!(parsed["city"]["countryCode"], "JP");
        assert!(parsed["distance_km"].as_f64().unwrap() > 0.0);
        assert!(parsed.get("notice").is_none());
        assert_eq!(parsed["timestamp"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_json_formatter_info() {
        assert_eq!(JsonFormatter.name(), "json");
        assert!(!JsonFormatter.description().is_empty());
    }
}
