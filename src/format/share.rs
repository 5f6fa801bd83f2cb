//! Share text

use crate::config::Config;
use crate::discover::Discovery;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::places::Place;

/// Text for sharing a place with someone
pub fn share_text(place: &Place) -> String {
    format!(
        "I found {}!\n{}",
        place.name.as_deref().unwrap_or("an amazing place"),
        place.display_address()
    )
}

/// Share formatter - short copy-ready text
pub struct ShareFormatter;

impl OutputFormatter for ShareFormatter {
    fn name(&self) -> &str {
        "share"
    }

    fn description(&self) -> &str {
        "Copy-ready share text"
    }

    fn format(&self, discovery: &Discovery, _config: &Config) -> Result<String> {
        Ok(share_text(&discovery.place))
    }
}
