//! City resolution for world discovery
//!
//! Picks a random populous city in a country. When the cities service
//! refuses the request (HTTP 403) a single hardcoded city stands in.

pub mod country;
pub mod geodb;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// A city as reported by the cities service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl City {
    /// City centre
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Trait for city data services
pub trait CityService: Send + Sync {
    /// Cities in `country_code` with at least `min_population` inhabitants
    fn find_cities(
        &self,
        country_code: &str,
        min_population: u64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<City>>> + Send;
}

/// (code, id, name, country, lat, lng, population)
type FallbackRow = (&'static str, u64, &'static str, &'static str, f64, f64, u64);

const FALLBACK_CITIES: &[FallbackRow] = &[
    ("JP", 1850147, "Tokyo", "Japan", 35.6762, 139.6503, 13_960_000),
    ("US", 5128581, "New York", "United States", 40.7128, -74.0060, 8_419_000),
    ("GB", 2643743, "London", "United Kingdom", 51.5074, -0.1278, 8_982_000),
    ("FR", 2988507, "Paris", "France", 48.8566, 2.3522, 2_161_000),
    ("DE", 2950159, "Berlin", "Germany", 52.5200, 13.4050, 3_669_000),
    ("IT", 3173435, "Rome", "Italy", 41.9028, 12.4964, 2_873_000),
    ("ES", 3117735, "Madrid", "Spain", 40.4168, -3.7038, 3_223_000),
    ("CA", 6167865, "Toronto", "Canada", 43.6532, -79.3832, 2_731_000),
    ("AU", 2147714, "Sydney", "Australia", -33.8688, 151.2093, 5_312_000),
    ("KR", 1835848, "Seoul", "South Korea", 37.5665, 126.9780, 9_776_000),
];

/// Index of the United States row
const DEFAULT_FALLBACK: usize = 1;

/// Hardcoded city for a country code; unknown codes get New York
pub fn fallback_city(country_code: &str) -> City {
    let row = FALLBACK_CITIES
        .iter()
        .find(|row| row.0.eq_ignore_ascii_case(country_code))
        .unwrap_or(&FALLBACK_CITIES[DEFAULT_FALLBACK]);

    let &(code, id, name, country, latitude, longitude, population) = row;
    City {
        id,
        name: name.to_string(),
        country: country.to_string(),
        country_code: code.to_string(),
        latitude,
        longitude,
        population,
        region: None,
    }
}

/// Resolves a random city for a country
pub struct CityResolver<C> {
    service: C,
    min_population: u64,
    limit: usize,
}

impl<C: CityService> CityResolver<C> {
    pub fn new(service: C, min_population: u64, limit: usize) -> Self {
        Self {
            service,
            min_population,
            limit: limit.max(1),
        }
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    /// Pick a random populous city in the country
    pub async fn resolve_random_city(
        &self,
        country_code: &str,
        rng: &dyn RandomSource,
    ) -> Result<City> {
        let code = country_code.trim().to_uppercase();

        let cities = match self
            .service
            .find_cities(&code, self.min_population, self.limit)
            .await
        {
            Ok(cities) => cities,
            Err(e) if e.status() == Some(403) => {
                warn!("Cities service denied the request ({}); using fallback city", e);
                return Ok(fallback_city(&code));
            }
            Err(e) => return Err(e),
        };

        debug!("{} candidate cities in {}", cities.len(), code);

        let i = rng
            .index(cities.len())
            .ok_or_else(|| Error::NoCitiesFound(code.clone()))?;
        cities.into_iter().nth(i).ok_or(Error::NoCitiesFound(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::pseudo::SeededSource;
    use std::sync::Mutex;

    enum Reply {
        Cities(Vec<City>),
        Status(u16),
    }

    struct StubCities {
        reply: Reply,
        requests: Mutex<Vec<(String, u64, usize)>>,
    }

    impl StubCities {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CityService for StubCities {
        async fn find_cities(
            &self,
            country_code: &str,
            min_population: u64,
            limit: usize,
        ) -> Result<Vec<City>> {
            self.requests
                .lock()
                .unwrap()
                .push((country_code.to_string(), min_population, limit));
            match &self.reply {
                Reply::Cities(cities) => Ok(cities.clone()),
                Reply::Status(code) => Err(Error::service("stub", *code, "nope")),
            }
        }
    }

    fn city(id: u64, name: &str) -> City {
        City {
            id,
            name: name.to_string(),
            country: "Japan".to_string(),
            country_code: "JP".to_string(),
            latitude: 34.0,
            longitude: 135.0,
            population: 500_000,
            region: None,
        }
    }

    #[tokio::test]
    async fn test_picks_from_candidates() {
        let candidates = vec![city(1, "Osaka"), city(2, "Kyoto"), city(3, "Kobe")];
        let resolver = CityResolver::new(StubCities::new(Reply::Cities(candidates.clone())), 100_000, 10);

        let picked = resolver
            .resolve_random_city("jp", &SeededSource::new(42))
            .await
            .unwrap();
        assert!(candidates.contains(&picked));

        let requests = resolver.service().requests.lock().unwrap().clone();
        assert_eq!(requests, vec![("JP".to_string(), 100_000, 10)]);
    }

    #[tokio::test]
    async fn test_seeded_pick_is_reproducible() {
        let candidates = vec![city(1, "Osaka"), city(2, "Kyoto"), city(3, "Kobe"), city(4, "Nara")];
        let resolver = CityResolver::new(StubCities::new(Reply::Cities(candidates)), 100_000, 10);

        let a = resolver.resolve_random_city("JP", &SeededSource::new(7)).await.unwrap();
        let b = resolver.resolve_random_city("JP", &SeededSource::new(7)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_forbidden_uses_fallback() {
        let resolver = CityResolver::new(StubCities::new(Reply::Status(403)), 100_000, 10);

        let city = resolver.resolve_random_city("fr", &SeededSource::new(1)).await.unwrap();
        assert_eq!(city.name, "Paris");
        assert_eq!(city.country_code, "FR");
    }

    #[tokio::test]
    async fn test_forbidden_unknown_code_uses_new_york() {
        let resolver = CityResolver::new(StubCities::new(Reply::Status(403)), 100_000, 10);

        let city = resolver.resolve_random_city("ZZ", &SeededSource::new(1)).await.unwrap();
        assert_eq!(city.name, "New York");
        assert_eq!(city.country_code, "US");
    }

    #[tokio::test]
    async fn test_no_cities() {
        let resolver = CityResolver::new(StubCities::new(Reply::Cities(Vec::new())), 100_000, 10);

        let err = resolver.resolve_random_city("zz", &SeededSource::new(1)).await.unwrap_err();
        assert!(matches!(err, Error::NoCitiesFound(ref code) if code == "ZZ"));
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let resolver = CityResolver::new(StubCities::new(Reply::Status(500)), 100_000, 10);

        let err = resolver.resolve_random_city("JP", &SeededSource::new(1)).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_fallback_table() {
        assert_eq!(fallback_city("KR").name, "Seoul");
        assert_eq!(fallback_city("au").coords(), Coordinates::new(-33.8688, 151.2093));
        assert_eq!(fallback_city("XX").name, "New York");
    }
}
