//! Application state
//!
//! Everything a front end needs between user actions: the configuration, the
//! discovery coordinator, the favorites store and the place currently on
//! screen. Built once at startup and passed around explicitly.

use crate::city::geodb::GeoDbClient;
use crate::city::CityResolver;
use crate::city::CityService;
use crate::config::Config;
use crate::discover::{Discovery, DiscoveryCoordinator, DiscoveryRequest, Report};
use crate::error::{Error, Result};
use crate::favorites::FavoritesStore;
use crate::format::share::share_text;
use crate::geo::{GeoLocator, PositionSource, ReportedPosition};
use crate::places::{AnyBackend, PlaceSearchClient, PlacesBackend, Provider};
use crate::rng::get_source;
use std::str::FromStr;
use tracing::debug;

/// Coordinator over the configured network services
pub type LiveCoordinator = DiscoveryCoordinator<ReportedPosition, AnyBackend, GeoDbClient>;

/// Build a coordinator from configuration
///
/// `position` is whatever the caller's device reported.
pub fn build_coordinator(
    config: &Config,
    position: ReportedPosition,
    seed: Option<u64>,
) -> Result<LiveCoordinator> {
    let provider = Provider::from_str(&config.search.provider).map_err(Error::Config)?;
    let backend = AnyBackend::from_config(provider, &config.api_keys);
    let places = PlaceSearchClient::from_config(backend, &config.search)?;

    let cities = CityResolver::new(
        GeoDbClient::new(&config.api_keys.geodb),
        config.search.min_population,
        config.search.city_candidates,
    );

    let locator = GeoLocator::new(position, &config.location);
    let rng = get_source(seed);
    debug!(
        "Using {} places backend, {} random source",
        provider_name(provider),
        rng.name()
    );

    Ok(DiscoveryCoordinator::new(locator, places, cities, rng)
        .with_radii(config.search.local_radius, config.search.world_radius))
}

fn provider_name(provider: Provider) -> &'static str {
    match provider {
        Provider::Google => "google",
        Provider::Geoapify => "geoapify",
    }
}

/// Explicit application state
pub struct AppState<P, B, C> {
    config: Config,
    coordinator: DiscoveryCoordinator<P, B, C>,
    favorites: FavoritesStore,
    current: Option<Discovery>,
}

impl<P, B, C> AppState<P, B, C>
where
    P: PositionSource,
    B: PlacesBackend,
    C: CityService,
{
    pub fn new(
        config: Config,
        coordinator: DiscoveryCoordinator<P, B, C>,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            config,
            coordinator,
            favorites,
            current: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &DiscoveryCoordinator<P, B, C> {
        &self.coordinator
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    /// The place currently on screen
    pub fn current(&self) -> Option<&Discovery> {
        self.current.as_ref()
    }

    /// Run one discovery; a found place becomes the current one
    ///
    /// A failed cycle keeps the previous place on screen.
    pub async fn discover(&mut self, request: &DiscoveryRequest) -> Report {
        let report = self.coordinator.run(request).await;
        if let Some(discovery) = report.discovery() {
            self.current = Some(discovery.clone());
        }
        report
    }

    /// Whether the current place is a favorite
    pub fn is_current_favorite(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|d| self.favorites.is_favorite(&d.place.id))
    }

    /// Toggle the current place in favorites
    ///
    /// Returns the new membership, or None when nothing is on screen.
    pub fn toggle_current_favorite(&mut self) -> Result<Option<bool>> {
        match &self.current {
            Some(discovery) => self.favorites.toggle(&discovery.place).map(Some),
            None => Ok(None),
        }
    }

    /// Share text for the current place
    pub fn share_text(&self) -> Option<String> {
        self.current.as_ref().map(|d| share_text(&d.place))
    }

    /// Maps link for the current place
    pub fn maps_url(&self, provider: Option<&str>) -> Result<Option<String>> {
        self.current
            .as_ref()
            .map(|d| self.config.format_url(provider, &d.place))
            .transpose()
    }
}

impl AppState<ReportedPosition, AnyBackend, GeoDbClient> {
    /// Build the state from configuration, loading favorites from disk
    pub fn from_config(config: Config, position: ReportedPosition, seed: Option<u64>) -> Result<Self> {
        let coordinator = build_coordinator(&config, position, seed)?;
        let favorites = FavoritesStore::load()?;
        Ok(Self::new(config, coordinator, favorites))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationConfig;
    use crate::coord::Coordinates;
    use crate::discover::testing::{FixedPlaces, Forbidden};
    use crate::error::GeolocationError;
    use crate::places::category::CategorySelection;
    use crate::places::Place;
    use crate::rng::pseudo::SeededSource;
    use tempfile::TempDir;

    fn state(places: Vec<Place>, dir: &TempDir) -> AppState<ReportedPosition, FixedPlaces, Forbidden> {
        let location = LocationConfig {
            use_ip: false,
            ..LocationConfig::default()
        };
        let coordinator = DiscoveryCoordinator::new(
            GeoLocator::new(
                ReportedPosition::Failed(GeolocationError::PermissionDenied),
                &location,
            ),
            PlaceSearchClient::new(FixedPlaces(places)),
            CityResolver::new(Forbidden, 100_000, 10),
            Box::new(SeededSource::new(3)),
        );
        let favorites = FavoritesStore::load_from(dir.path().join("favorites.json")).unwrap();
        AppState::new(Config::default(), coordinator, favorites)
    }

    fn tower() -> Place {
        Place::new("ChIJ123", Coordinates::new(35.6586, 139.7454))
            .with_name("Tokyo Tower")
            .with_address("4-2-8 Shibakoen")
    }

    #[tokio::test]
    async fn test_discover_sets_current() {
        let dir = TempDir::new().unwrap();
        let mut state = state(vec![tower()], &dir);
        assert!(state.current().is_none());

        let report = state.discover(&DiscoveryRequest::local(CategorySelection::default())).await;
        assert!(report.discovery().is_some());
        assert_eq!(state.current().unwrap().place.id, "ChIJ123");
        assert_eq!(
            state.share_text().unwrap(),
            "I found Tokyo Tower!\n4-2-8 Shibakoen"
        );
        assert_eq!(
            state.maps_url(None).unwrap().unwrap(),
            "https://www.google.com/maps/search/?api=1&query=Tokyo%20Tower&query_place_id=ChIJ123"
        );
    }

    #[tokio::test]
    async fn test_failed_discovery_keeps_current() {
        let dir = TempDir::new().unwrap();
        let mut state = state(Vec::new(), &dir);
        state.current = Some(crate::format::fixtures::local());

        let report = state.discover(&DiscoveryRequest::default()).await;
        assert_eq!(report.message(), Some("No places found nearby"));
        assert_eq!(state.current().unwrap().place.name.as_deref(), Some("Senso-ji"));
    }

    #[tokio::test]
    async fn test_toggle_current_favorite() {
        let dir = TempDir::new().unwrap();
        let mut state = state(vec![tower()], &dir);

        assert_eq!(state.toggle_current_favorite().unwrap(), None);

        state.discover(&DiscoveryRequest::default()).await;
        assert_eq!(state.toggle_current_favorite().unwrap(), Some(true));
        assert!(state.is_current_favorite());
        assert_eq!(state.favorites().list()[0].name, "Tokyo Tower");

        assert_eq!(state.toggle_current_favorite().unwrap(), Some(false));
        assert!(!state.is_current_favorite());
    }

    #[test]
    fn test_nothing_on_screen() {
        let dir = TempDir::new().unwrap();
        let state = state(Vec::new(), &dir);
        assert!(state.share_text().is_none());
        assert!(state.maps_url(None).unwrap().is_none());
    }

    #[test]
    fn test_build_coordinator_rejects_unknown_provider() {
        let mut config = Config::default();
        config.search.provider = "bing".to_string();
        assert!(build_coordinator(&config, ReportedPosition::unsupported(), None).is_err());
    }

    #[test]
    fn test_build_coordinator_uses_backend_radius() {
        let mut config = Config::default();
        config.search.provider = "geoapify".to_string();
        config.location.use_ip = false;
        let coordinator = build_coordinator(&config, ReportedPosition::unsupported(), Some(1)).unwrap();
        assert_eq!(coordinator.local_radius(), 50_000.0);
    }
}
