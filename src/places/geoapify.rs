//! Geoapify Places backend
//!
//! Geoapify takes the whole category list in one request and answers with a
//! GeoJSON feature collection.

use crate::constants::api::GEOAPIFY_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::{category, Place, PlacesBackend, SearchStrategy};
use serde::Deserialize;

const SERVICE: &str = "Geoapify";

/// Default local radius in meters
const LOCAL_RADIUS_M: f64 = 50_000.0;

/// Geoapify Places backend
#[derive(Debug, Clone)]
pub struct GeoapifyBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    place_id: String,
    name: Option<String>,
    formatted: Option<String>,
    address_line2: Option<String>,
    lat: f64,
    lon: f64,
    #[serde(default)]
    categories: Vec<String>,
    website: Option<String>,
    contact: Option<Contact>,
    facilities: Option<Facilities>,
    wiki_and_media: Option<WikiAndMedia>,
}

#[derive(Debug, Deserialize)]
struct Contact {
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Facilities {
    wheelchair: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WikiAndMedia {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl From<Properties> for Place {
    fn from(raw: Properties) -> Self {
        let mut place = Place::new(raw.place_id, Coordinates::new(raw.lat, raw.lon));
        place.name = raw.name;
        place.address = raw.formatted.or(raw.address_line2);
        // most specific tag first
        let mut categories = raw.categories;
        categories.sort_by_key(|c| std::cmp::Reverse(c.matches('.').count()));
        place.categories = categories;
        place.website = raw.website;
        place.phone = raw.contact.and_then(|c| c.phone);
        place.wheelchair_accessible = raw.facilities.and_then(|f| f.wheelchair);
        place.summary = raw.wiki_and_media.and_then(|w| w.description);
        place
    }
}

impl GeoapifyBackend {
    /// Create a backend with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: GEOAPIFY_URL.to_string(),
        }
    }

    /// Point the backend at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl PlacesBackend for GeoapifyBackend {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn preferred_strategy(&self) -> SearchStrategy {
        SearchStrategy::Single
    }

    fn default_local_radius(&self) -> f64 {
        LOCAL_RADIUS_M
    }

    fn translate(&self, categories: &[String]) -> Vec<String> {
        category::geoapify_categories(categories)
    }

    fn default_terms(&self) -> Vec<String> {
        category::DEFAULT_CATEGORIES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn nearby(
        &self,
        center: Coordinates,
        radius_m: f64,
        terms: &[String],
        limit: usize,
    ) -> Result<Vec<Place>> {
        let url = format!("{}/places", self.base_url);
        let categories = terms.join(",");
        let filter = format!("circle:{},{},{}", center.lng, center.lat, radius_m.round() as u64);
        let bias = format!("proximity:{},{}", center.lng, center.lat);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("categories", categories.as_str()),
                ("filter", filter.as_str()),
                ("bias", bias.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(Error::service(SERVICE, status.as_u16(), message));
        }

        let body: FeatureCollection = response.json().await?;
        Ok(body
            .features
            .into_iter()
            .map(|f| Place::from(f.properties))
            .collect())
    }
}
