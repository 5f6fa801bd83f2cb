//! Map link formatters

use crate::config::Config;
use crate::discover::Discovery;
use crate::error::Result;
use crate::format::OutputFormatter;

/// URL formatter - outputs a map link for the discovered place
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        discovery: &Discovery,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        config.format_url(provider, &discovery.place)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the place"
    }

    fn format(&self, discovery: &Discovery, config: &Config) -> Result<String> {
        self.format_with_provider(discovery, config, None)
    }
}

/// Street View formatter - panorama link at the place's coordinates
pub struct StreetViewFormatter;

impl OutputFormatter for StreetViewFormatter {
    fn name(&self) -> &str {
        "streetview"
    }

    fn description(&self) -> &str {
        "Street View panorama URL"
    }

    fn format(&self, discovery: &Discovery, config: &Config) -> Result<String> {
        UrlFormatter.format_with_provider(discovery, config, Some("streetview"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_url_format_default_provider() {
        let output = UrlFormatter
            .format(&fixtures::local(), &Config::default())
            .unwrap();

        assert!(output.starts_with("https://www.google.com/maps/search/"));
        assert!(output.contains("query=Senso-ji"));
        assert!(output.contains("query_place_id=ChIJ8T1GpMGOGGARDYGSgpooDWw"));
    }

    #[test]
    fn test_url_format_with_provider() {
        let output = UrlFormatter
            .format_with_provider(&fixtures::local(), &Config::default(), Some("openstreetmap"))
            .unwrap();

        assert!(output.contains("openstreetmap.org"));
        assert!(output.contains("mlat=35.7148"));
    }

    #[test]
    fn test_url_format_unknown_provider() {
        let result =
            UrlFormatter.format_with_provider(&fixtures::local(), &Config::default(), Some("bing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_streetview_format() {
        let output = StreetViewFormatter
            .format(&fixtures::local(), &Config::default())
            .unwrap();
        assert_eq!(
            output,
            "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint=35.7148,139.7967"
        );
    }
}
