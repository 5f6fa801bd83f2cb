//! Google Places backend
//!
//! Uses the Nearby Search web service. Google accepts a single `type` per
//! request, so the per-type strategy suits it best.

use crate::constants::api::GOOGLE_PLACES_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::{category, Place, PlacesBackend, SearchStrategy};
use serde::Deserialize;
use tracing::debug;

const SERVICE: &str = "Google Places";

/// Default local radius in meters
const LOCAL_RADIUS_M: f64 = 200_000.0;

/// Google Places Nearby Search backend
#[derive(Debug, Clone)]
pub struct GoogleBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    place_id: String,
    name: Option<String>,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
    rating: Option<f64>,
    price_level: Option<u8>,
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    photos: Vec<Photo>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

impl From<GooglePlace> for Place {
    fn from(raw: GooglePlace) -> Self {
        let mut place = Place::new(
            raw.place_id,
            Coordinates::new(raw.geometry.location.lat, raw.geometry.location.lng),
        );
        place.name = raw.name;
        place.address = raw.vicinity.or(raw.formatted_address);
        place.categories = raw.types;
        place.rating = raw.rating;
        place.price_level = raw.price_level;
        place.open_now = raw.opening_hours.and_then(|h| h.open_now);
        place.photo_ref = raw.photos.into_iter().next().map(|p| p.photo_reference);
        place.phone = raw.formatted_phone_number;
        place.website = raw.website;
        place
    }
}

impl GoogleBackend {
    /// Create a backend with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: GOOGLE_PLACES_URL.to_string(),
        }
    }

    /// Point the backend at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl PlacesBackend for GoogleBackend {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn preferred_strategy(&self) -> SearchStrategy {
        SearchStrategy::PerType
    }

    fn default_local_radius(&self) -> f64 {
        LOCAL_RADIUS_M
    }

    fn translate(&self, categories: &[String]) -> Vec<String> {
        category::google_types(categories)
    }

    fn default_terms(&self) -> Vec<String> {
        category::GOOGLE_DEFAULT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn nearby(
        &self,
        center: Coordinates,
        radius_m: f64,
        terms: &[String],
        _limit: usize,
    ) -> Result<Vec<Place>> {
        if terms.len() > 1 {
            debug!("Google accepts one type per request; using {}", terms[0]);
        }

        let url = format!("{}/nearbysearch/json", self.base_url);
        let location = format!("{},{}", center.lat, center.lng);
        let radius = format!("{}", radius_m.round() as u64);

        let mut query = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(first) = terms.first() {
            query.push(("type", first.as_str()));
        }

        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::service(SERVICE, status.as_u16(), status.to_string()));
        }

        let body: NearbyResponse = response.json().await?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().map(Place::from).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(Error::SearchService {
                service: SERVICE,
                status: Some(status.as_u16()),
                message: body
                    .error_message
                    .map(|m| format!("{}: {}", other, m))
                    .unwrap_or_else(|| other.to_string()),
            }),
        }
    }

    fn photo_url(&self, reference: &str) -> Option<String> {
        Some(format!(
            "{}/photo?maxwidth=600&photo_reference={}&key={}",
            self.base_url,
            urlencoding::encode(reference),
            urlencoding::encode(&self.api_key)
        ))
    }
}
