//! IP-based geolocation
//!
//! Uses ip-api.com for IP geolocation with file-based caching.

use crate::config::defaults::APP_DIR_NAME;
use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::error::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const SERVICE: &str = "IP location";

/// A location found by IP lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLocation {
    pub lat: f64,
    pub lng: f64,
    /// City, region, country as far as known
    pub display_name: String,
}

/// IP location service with caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    base_url: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
    message: Option<String>,
}

/// Cached location data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: IpLocation,
    cached_at: DateTime<Utc>,
}

impl IpLocator {
    /// Create a new IP locator with default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir().map(|p| p.join(APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            base_url: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::without_cache()
        }
    }

    /// Create an IP locator without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: IP_API_URL.to_string(),
            cache_path: None,
        }
    }

    /// Point the locator at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get current location based on IP address
    pub async fn locate(&self) -> Result<IpLocation> {
        if let Some(cached) = self.load_cache() {
            debug!("IP location served from cache");
            return Ok(cached);
        }

        let location = self.fetch_location().await?;
        self.save_cache(&location);

        Ok(location)
    }

    /// Fetch location from ip-api.com
    async fn fetch_location(&self) -> Result<IpLocation> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::service(SERVICE, status.as_u16(), status.to_string()));
        }

        let data: IpApiResponse = response.json().await?;

        if data.status != "success" {
            return Err(Error::SearchService {
                service: SERVICE,
                status: None,
                message: data.message.unwrap_or_else(|| "lookup failed".to_string()),
            });
        }

        let missing = |field: &str| Error::SearchService {
            service: SERVICE,
            status: None,
            message: format!("No {} in response", field),
        };
        let lat = data.lat.ok_or_else(|| missing("latitude"))?;
        let lng = data.lon.ok_or_else(|| missing("longitude"))?;

        let display_name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(IpLocation {
            lat,
            lng,
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }

    /// Cached location, if one was written within the TTL
    fn load_cache(&self) -> Option<IpLocation> {
        let path = self.cache_path.as_ref()?;
        let cached: CachedLocation = serde_json::from_str(&fs::read_to_string(path).ok()?).ok()?;
        cached.is_fresh(Utc::now()).then_some(cached.location)
    }

    /// Write the cache; failures are logged and ignored
    fn save_cache(&self, location: &IpLocation) {
        let Some(path) = &self.cache_path else {
            return;
        };

        let cached = CachedLocation {
            location: location.clone(),
            cached_at: Utc::now(),
        };
        let written = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| {
                let content = serde_json::to_string_pretty(&cached)?;
                fs::write(path, content)
            });

        if let Err(e) = written {
            debug!("Could not write IP location cache {}: {}", path.display(), e);
        }
    }

    /// Forget the cached location
    pub fn clear_cache(&self) {
        if let Some(path) = &self.cache_path {
            let _ = fs::remove_file(path);
        }
    }
}

impl CachedLocation {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.cached_at);
        age >= TimeDelta::zero() && age < TimeDelta::seconds(IP_LOCATION_TTL_SECS as i64)
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}
