//! Human-readable text output formatter

use crate::config::Config;
use crate::discover::Discovery;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::places::category::format_types;

/// Category labels shown per place
const MAX_TYPE_LABELS: usize = 3;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, discovery: &Discovery, _config: &Config) -> Result<String> {
        let place = &discovery.place;
        let mut output = String::new();

        // Header
        output.push_str(&format!("{}\n", place.display_name()));
        output.push_str(&format!("{}\n", place.display_address()));
        match &discovery.city {
            Some(city) => output.push_str(&format!(
                "About {:.1} km from {}, {}\n",
                discovery.distance_km, city.name, city.country
            )),
            None => output.push_str(&format!(
                "About {:.1} km from your location\n",
                discovery.distance_km
            )),
        }

        // Details
        let mut details = Vec::new();

        if let Some(city) = &discovery.city {
            details.push(format!("City: {}, {}", city.name, city.country));
            details.push(format!("Population: {}", group_thousands(city.population)));
        }
        if !place.categories.is_empty() {
            details.push(format!(
                "Category: {}",
                format_types(&place.categories, MAX_TYPE_LABELS)
            ));
        }
        if let Some(phone) = &place.phone {
            details.push(format!("Phone: {}", phone));
        }
        if let Some(website) = &place.website {
            details.push(format!("Website: {}", website));
        }
        if let Some(rating) = place.rating {
            details.push(format!("{} Rating: {}/5", stars(rating), rating));
        }
        if let Some(level) = place.price_level {
            details.push(format!("Price: {}", "$".repeat(usize::from(level) + 1)));
        }
        if let Some(open) = place.open_now {
            details.push(if open { "Open now" } else { "Closed" }.to_string());
        }
        if let Some(accessible) = place.wheelchair_accessible {
            details.push(format!(
                "Wheelchair accessible: {}",
                if accessible { "Yes" } else { "No" }
            ));
        }
        if let Some(summary) = &place.summary {
            details.push(summary.clone());
        }
        if let Some(image) = &discovery.image_url {
            details.push(format!("Image: {}", image));
        }

        if !details.is_empty() {
            output.push('\n');
            for line in details {
                output.push_str(&format!("  {}\n", line));
            }
        }

        if let Some(notice) = &discovery.notice {
            output.push_str(&format!("\nNote: {}\n", notice));
        }

        Ok(output)
    }
}

/// One star per whole rating point
fn stars(rating: f64) -> String {
    "★".repeat(rating.clamp(0.0, 5.0).floor() as usize)
}

/// 13960000 -> "13,960,000"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
