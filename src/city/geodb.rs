//! GeoDB Cities client
//!
//! Talks to the RapidAPI-hosted service when a key is configured, otherwise
//! to the rate-limited free service.

use crate::city::{City, CityService};
use crate::constants::api::{GEODB_FREE_URL, GEODB_RAPIDAPI_HOST, GEODB_RAPIDAPI_URL};
use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::debug;

const SERVICE: &str = "GeoDB Cities";

/// GeoDB Cities backend
#[derive(Debug, Clone)]
pub struct GeoDbClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    data: Vec<City>,
}

impl GeoDbClient {
    /// Create a client; an empty key selects the free service
    pub fn new(api_key: &str) -> Self {
        let (api_key, base_url) = if api_key.is_empty() {
            (None, GEODB_FREE_URL)
        } else {
            (Some(api_key.to_string()), GEODB_RAPIDAPI_URL)
        };

        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl CityService for GeoDbClient {
    async fn find_cities(
        &self,
        country_code: &str,
        min_population: u64,
        limit: usize,
    ) -> Result<Vec<City>> {
        let url = format!("{}/cities", self.base_url);
        debug!("Fetching cities for {} from {}", country_code, url);

        let mut request = self.client.get(&url).query(&[
            ("countryIds", country_code.to_string()),
            ("minPopulation", min_population.to_string()),
            ("limit", limit.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request
                .header("X-RapidAPI-Key", key)
                .header("X-RapidAPI-Host", GEODB_RAPIDAPI_HOST);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(Error::service(SERVICE, status.as_u16(), message));
        }

        let body: CitiesResponse = response.json().await?;
        Ok(body.data)
    }
}
