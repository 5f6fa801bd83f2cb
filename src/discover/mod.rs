//! Discovery cycle
//!
//! One call runs one resolve → search → random-pick cycle. Local mode
//! searches around the user's position; world mode around a random city in
//! a chosen country.
//!
//! Overlapping calls are independent. The coordinator only counts how many
//! are in flight so `phase()` can report `Searching`.

use crate::city::{City, CityResolver, CityService};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{GeoLocator, PositionSource};
use crate::places::category::CategorySelection;
use crate::places::{Place, PlaceSearchClient, PlacesBackend};
use crate::rng::RandomSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// One discovered place, ready for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discovery {
    pub place: Place,
    /// Centre of the search: user position or city centre
    pub origin: Coordinates,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Why the device position was not used, if it wasn't
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Set in world mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    /// Category keys the search ran with
    pub categories: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// What to discover
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    /// Country code for world mode; local mode when None
    pub country: Option<String>,
    pub categories: CategorySelection,
}

impl DiscoveryRequest {
    pub fn local(categories: CategorySelection) -> Self {
        Self {
            country: None,
            categories,
        }
    }

    pub fn world(country: impl Into<String>, categories: CategorySelection) -> Self {
        Self {
            country: Some(country.into()),
            categories,
        }
    }
}

/// Result of `run`: a discovery or a message for the user
#[derive(Debug, Clone)]
pub enum Report {
    Found(Box<Discovery>),
    Failed { message: String },
}

impl Report {
    pub fn discovery(&self) -> Option<&Discovery> {
        match self {
            Self::Found(d) => Some(&**d),
            Self::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Failed { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
}

/// Terminal state of the last finished cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Decrements the in-flight counter when a cycle ends or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs discovery cycles
pub struct DiscoveryCoordinator<P, B, C> {
    locator: GeoLocator<P>,
    places: PlaceSearchClient<B>,
    cities: CityResolver<C>,
    rng: Box<dyn RandomSource>,
    local_radius: Option<f64>,
    world_radius: f64,
    in_flight: AtomicUsize,
    last_outcome: Mutex<Option<Outcome>>,
}

impl<P, B, C> DiscoveryCoordinator<P, B, C>
where
    P: PositionSource,
    B: PlacesBackend,
    C: CityService,
{
    pub fn new(
        locator: GeoLocator<P>,
        places: PlaceSearchClient<B>,
        cities: CityResolver<C>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            locator,
            places,
            cities,
            rng,
            local_radius: None,
            world_radius: crate::config::defaults::DEFAULT_WORLD_RADIUS,
            in_flight: AtomicUsize::new(0),
            last_outcome: Mutex::new(None),
        }
    }

    /// Override the search radii (meters); None keeps the backend's local default
    pub fn with_radii(mut self, local: Option<f64>, world: f64) -> Self {
        self.local_radius = local;
        self.world_radius = world;
        self
    }

    pub fn places(&self) -> &PlaceSearchClient<B> {
        &self.places
    }

    /// Local radius in effect
    pub fn local_radius(&self) -> f64 {
        self.local_radius
            .unwrap_or_else(|| self.places.backend().default_local_radius())
    }

    /// `Searching` while any cycle is running
    pub fn phase(&self) -> Phase {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            Phase::Searching
        } else {
            Phase::Idle
        }
    }

    /// How the most recent cycle ended
    pub fn last_outcome(&self) -> Option<Outcome> {
        *self.last_outcome.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn finish<T>(&self, result: &Result<T>) {
        let outcome = if result.is_ok() {
            Outcome::Succeeded
        } else {
            Outcome::Failed
        };
        *self.last_outcome.lock().unwrap_or_else(|e| e.into_inner()) = Some(outcome);
    }

    /// Discover a place around the user
    pub async fn discover_local(&self, selection: &CategorySelection) -> Result<Discovery> {
        let _guard = InFlight::enter(&self.in_flight);
        let result = self.local_cycle(selection).await;
        self.finish(&result);
        result
    }

    /// Discover a place around a random city in `country_code`
    pub async fn discover_world(
        &self,
        country_code: &str,
        selection: &CategorySelection,
    ) -> Result<Discovery> {
        let _guard = InFlight::enter(&self.in_flight);
        let result = self.world_cycle(country_code, selection).await;
        self.finish(&result);
        result
    }

    /// Run one cycle; failures become a user-facing message
    pub async fn run(&self, request: &DiscoveryRequest) -> Report {
        let result = match &request.country {
            Some(code) => self.discover_world(code, &request.categories).await,
            None => self.discover_local(&request.categories).await,
        };

        match result {
            Ok(discovery) => Report::Found(Box::new(discovery)),
            Err(e) => {
                warn!("Discovery failed: {}", e);
                Report::Failed {
                    message: user_message(&e, request.country.is_some()),
                }
            }
        }
    }

    async fn local_cycle(&self, selection: &CategorySelection) -> Result<Discovery> {
        let located = self.locator.resolve().await;
        let categories = selection.resolve(&*self.rng);

        let mut discovery = self
            .pick(located.coords, &categories, self.local_radius())
            .await?;
        discovery.notice = located.notice;
        Ok(discovery)
    }

    async fn world_cycle(
        &self,
        country_code: &str,
        selection: &CategorySelection,
    ) -> Result<Discovery> {
        let city = self
            .cities
            .resolve_random_city(country_code, &*self.rng)
            .await?;
        info!("Exploring {}, {}", city.name, city.country);

        let categories = selection.resolve(&*self.rng);
        let mut discovery = self
            .pick(city.coords(), &categories, self.world_radius)
            .await?;
        discovery.city = Some(city);
        Ok(discovery)
    }

    async fn pick(
        &self,
        origin: Coordinates,
        categories: &[String],
        radius_m: f64,
    ) -> Result<Discovery> {
        let mut places = self.places.search(origin, categories, radius_m).await?;
        debug!("{} candidate places", places.len());

        let i = self.rng.index(places.len()).ok_or(Error::NoPlacesFound)?;
        let place = places.swap_remove(i);

        Ok(Discovery {
            distance_km: origin.distance_km(&place.coords),
            image_url: self.places.image_url(&place),
            place,
            origin,
            notice: None,
            city: None,
            categories: categories.to_vec(),
            timestamp: Utc::now(),
        })
    }
}

/// Message shown to the user for a failed cycle
pub fn user_message(err: &Error, world: bool) -> String {
    match err {
        Error::NoPlacesFound if world => "No places found in this city area".to_string(),
        Error::NoPlacesFound => "No places found nearby".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::places::SearchStrategy;

    /// Returns the same places for every request
    pub struct FixedPlaces(pub Vec<Place>);

    impl PlacesBackend for FixedPlaces {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn preferred_strategy(&self) -> SearchStrategy {
            SearchStrategy::Single
        }

        fn default_local_radius(&self) -> f64 {
            50_000.0
        }

        fn translate(&self, categories: &[String]) -> Vec<String> {
            categories.to_vec()
        }

        fn default_terms(&self) -> Vec<String> {
            vec!["tourism".to_string()]
        }

        async fn nearby(
            &self,
            _center: Coordinates,
            _radius_m: f64,
            _terms: &[String],
            _limit: usize,
        ) -> Result<Vec<Place>> {
            Ok(self.0.clone())
        }
    }

    /// Cities service that always refuses
    pub struct Forbidden;

    impl CityService for Forbidden {
        async fn find_cities(&self, _: &str, _: u64, _: usize) -> Result<Vec<City>> {
            Err(Error::service("cities", 403, "forbidden"))
        }
    }

    /// Cities service with no cities anywhere
    pub struct NoCities;

    impl CityService for NoCities {
        async fn find_cities(&self, _: &str, _: u64, _: usize) -> Result<Vec<City>> {
            Ok(Vec::new())
        }
    }
}
