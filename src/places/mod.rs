//! Places search
//!
//! `PlaceSearchClient` wraps one `PlacesBackend` (Google Places or Geoapify)
//! and runs a search in one of two strategies:
//!
//! - **single**: every filter term in one request, capped at `max_results`
//! - **per_type**: one request per term (first `max_types` terms), merged and
//!   de-duplicated by place id
//!
//! ## Flex Point
//! Adding a new places service requires:
//! 1. Create `src/places/{service}.rs` implementing `PlacesBackend`
//! 2. Add a `Provider` variant and an `AnyBackend` arm below

pub mod category;
pub mod geoapify;
pub mod google;

use crate::config::defaults::AUTO;
use crate::config::{ApiKeysConfig, SearchConfig};
use crate::constants::api::PLACEHOLDER_IMAGE_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use tracing::{debug, warn};

/// A normalized search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Identifier, unique per source service
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub coords: Coordinates,
    /// Category tags in service vocabulary, most specific first
    #[serde(default)]
    pub categories: Vec<String>,
    /// 0-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// 0-4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Place {
    /// Create a bare place
    pub fn new(id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: None,
            address: None,
            coords,
            categories: Vec::new(),
            rating: None,
            price_level: None,
            open_now: None,
            photo_ref: None,
            phone: None,
            website: None,
            wheelchair_accessible: None,
            summary: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Name for display
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown name")
    }

    /// Address for display
    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or("Address unknown")
    }
}

/// How a search fans out over filter terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    Single,
    PerType,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "per_type" | "per-type" | "pertype" => Ok(Self::PerType),
            _ => Err(format!("Unknown search strategy: {}", s)),
        }
    }
}

/// Available places services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Geoapify,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "geoapify" => Ok(Self::Geoapify),
            _ => Err(format!("Unknown places provider: {}", s)),
        }
    }
}

/// Trait for places search services
pub trait PlacesBackend: Send + Sync {
    /// Returns the service name used in logs and errors
    fn name(&self) -> &'static str;

    /// Strategy that suits the service's query model
    fn preferred_strategy(&self) -> SearchStrategy;

    /// Local-mode search radius in meters
    fn default_local_radius(&self) -> f64;

    /// Translate category keys into filter terms (may be empty)
    fn translate(&self, categories: &[String]) -> Vec<String>;

    /// Terms searched when translation yields nothing
    fn default_terms(&self) -> Vec<String>;

    /// Query places around `center` matching `terms`
    fn nearby(
        &self,
        center: Coordinates,
        radius_m: f64,
        terms: &[String],
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Place>>> + Send;

    /// URL of a photo by the service's reference, if it serves photos
    fn photo_url(&self, _reference: &str) -> Option<String> {
        None
    }
}

/// Backend chosen at runtime from configuration
pub enum AnyBackend {
    Google(google::GoogleBackend),
    Geoapify(geoapify::GeoapifyBackend),
}

impl AnyBackend {
    /// Build the configured backend
    pub fn from_config(provider: Provider, keys: &ApiKeysConfig) -> Self {
        if provider == Provider::Google && keys.google.is_empty() {
            warn!("No Google API key configured (api_keys.google)");
        }
        if provider == Provider::Geoapify && keys.geoapify.is_empty() {
            warn!("No Geoapify API key configured (api_keys.geoapify)");
        }
        match provider {
            Provider::Google => Self::Google(google::GoogleBackend::new(&keys.google)),
            Provider::Geoapify => Self::Geoapify(geoapify::GeoapifyBackend::new(&keys.geoapify)),
        }
    }
}

impl PlacesBackend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Google(b) => b.name(),
            Self::Geoapify(b) => b.name(),
        }
    }

    fn preferred_strategy(&self) -> SearchStrategy {
        match self {
            Self::Google(b) => b.preferred_strategy(),
            Self::Geoapify(b) => b.preferred_strategy(),
        }
    }

    fn default_local_radius(&self) -> f64 {
        match self {
            Self::Google(b) => b.default_local_radius(),
            Self::Geoapify(b) => b.default_local_radius(),
        }
    }

    fn translate(&self, categories: &[String]) -> Vec<String> {
        match self {
            Self::Google(b) => b.translate(categories),
            Self::Geoapify(b) => b.translate(categories),
        }
    }

    fn default_terms(&self) -> Vec<String> {
        match self {
            Self::Google(b) => b.default_terms(),
            Self::Geoapify(b) => b.default_terms(),
        }
    }

    async fn nearby(
        &self,
        center: Coordinates,
        radius_m: f64,
        terms: &[String],
        limit: usize,
    ) -> Result<Vec<Place>> {
        match self {
            Self::Google(b) => b.nearby(center, radius_m, terms, limit).await,
            Self::Geoapify(b) => b.nearby(center, radius_m, terms, limit).await,
        }
    }

    fn photo_url(&self, reference: &str) -> Option<String> {
        match self {
            Self::Google(b) => b.photo_url(reference),
            Self::Geoapify(b) => b.photo_url(reference),
        }
    }
}

/// Search client over one backend
pub struct PlaceSearchClient<B> {
    backend: B,
    strategy: SearchStrategy,
    max_types: usize,
    max_results: usize,
}

impl<B: PlacesBackend> PlaceSearchClient<B> {
    /// Create a client using the backend's preferred strategy and default limits
    pub fn new(backend: B) -> Self {
        let strategy = backend.preferred_strategy();
        Self {
            backend,
            strategy,
            max_types: crate::config::defaults::DEFAULT_MAX_TYPES,
            max_results: crate::config::defaults::DEFAULT_MAX_RESULTS,
        }
    }

    /// Create a client from search settings
    pub fn from_config(backend: B, config: &SearchConfig) -> Result<Self> {
        let mut client = Self::new(backend).with_limits(config.max_types, config.max_results);
        if config.strategy != AUTO {
            client.strategy = SearchStrategy::from_str(&config.strategy).map_err(Error::Config)?;
        }
        Ok(client)
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_limits(mut self, max_types: usize, max_results: usize) -> Self {
        self.max_types = max_types.max(1);
        self.max_results = max_results.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Filter terms for a category list, falling back to the backend defaults
    pub fn terms_for(&self, categories: &[String]) -> Vec<String> {
        let terms = self.backend.translate(categories);
        if terms.is_empty() {
            debug!("No {} terms for {:?}, using defaults", self.backend.name(), categories);
            self.backend.default_terms()
        } else {
            terms
        }
    }

    /// Search places around `center`
    pub async fn search(
        &self,
        center: Coordinates,
        categories: &[String],
        radius_m: f64,
    ) -> Result<Vec<Place>> {
        center.validate()?;
        if !(radius_m > 0.0) {
            return Err(Error::InvalidRadius(format!("Radius must be positive, got {}", radius_m)));
        }

        let terms = self.terms_for(categories);
        debug!(
            "Searching {} within {}m of {} for {:?} ({:?})",
            self.backend.name(),
            radius_m,
            center,
            terms,
            self.strategy
        );

        match self.strategy {
            SearchStrategy::Single => {
                let places = self
                    .backend
                    .nearby(center, radius_m, &terms, self.max_results)
                    .await?;
                let mut merged = merge_unique(places);
                merged.truncate(self.max_results);
                Ok(merged)
            }
            SearchStrategy::PerType => self.search_per_type(center, &terms, radius_m).await,
        }
    }

    async fn search_per_type(
        &self,
        center: Coordinates,
        terms: &[String],
        radius_m: f64,
    ) -> Result<Vec<Place>> {
        let mut all = Vec::new();
        let mut succeeded = 0usize;
        let mut transport_failure = None;

        for term in terms.iter().take(self.max_types) {
            match self
                .backend
                .nearby(center, radius_m, std::slice::from_ref(term), self.max_results)
                .await
            {
                Ok(places) => {
                    debug!("{} returned {} places for {}", self.backend.name(), places.len(), term);
                    succeeded += 1;
                    all.extend(places);
                }
                Err(e) => {
                    warn!("{} search for {} failed: {}", self.backend.name(), term, e);
                    if e.is_transport() {
                        transport_failure = Some(e);
                    }
                }
            }
        }

        if succeeded == 0 {
            if let Some(e) = transport_failure {
                return Err(e);
            }
        }

        Ok(merge_unique(all))
    }

    /// Image for a place: service photo, else a placeholder for named places
    pub fn image_url(&self, place: &Place) -> Option<String> {
        if let Some(url) = place
            .photo_ref
            .as_deref()
            .and_then(|r| self.backend.photo_url(r))
        {
            return Some(url);
        }
        place.name.as_ref().map(|_| {
            format!(
                "{}/{}/600/400",
                PLACEHOLDER_IMAGE_URL,
                urlencoding::encode(&place.id)
            )
        })
    }
}

/// De-duplicate by id; a later duplicate replaces the earlier one in place
fn merge_unique(places: Vec<Place>) -> Vec<Place> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Place> = Vec::with_capacity(places.len());

    for place in places {
        match index.get(&place.id) {
            Some(&i) => merged[i] = place,
            None => {
                index.insert(place.id.clone(), merged.len());
                merged.push(place);
            }
        }
    }

    merged
}
