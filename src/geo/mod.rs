//! Location resolution
//!
//! `GeoLocator` turns whatever the device can report into a usable
//! coordinate: the device position if it arrives in time, otherwise an IP
//! lookup, otherwise a fixed default. It never fails.

pub mod ip_location;

use crate::config::LocationConfig;
use crate::coord::Coordinates;
use crate::error::GeolocationError;
use ip_location::IpLocator;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Hints passed to a position source
#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl From<&LocationConfig> for PositionOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: config.timeout(),
        }
    }
}

/// Trait for on-device position providers
pub trait PositionSource: Send + Sync {
    /// Report the current position
    ///
    /// The locator enforces `options.timeout`; sources need not.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// A position handed in by the caller
///
/// This is how a front end that owns the real geolocation API (a browser,
/// a phone, command-line flags) passes its answer to the locator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportedPosition {
    Available(Coordinates),
    Failed(GeolocationError),
}

impl ReportedPosition {
    /// Nothing reported: the device has no geolocation support
    pub fn unsupported() -> Self {
        Self::Failed(GeolocationError::Unsupported)
    }
}

impl From<Option<Coordinates>> for ReportedPosition {
    fn from(coords: Option<Coordinates>) -> Self {
        coords.map(Self::Available).unwrap_or_else(Self::unsupported)
    }
}

impl PositionSource for ReportedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        match *self {
            Self::Available(coords) => Ok(coords),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Where a resolved coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    Ip,
    Default,
}

/// A resolved location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Located {
    pub coords: Coordinates,
    pub source: LocationSource,
    /// Human-readable explanation when the device position was not used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Resolves the user's coordinate with fallbacks
pub struct GeoLocator<P> {
    source: P,
    options: PositionOptions,
    ip: Option<IpLocator>,
    fallback: Coordinates,
    fallback_label: String,
}

impl<P: PositionSource> GeoLocator<P> {
    /// Create a locator from location settings
    ///
    /// IP lookup uses the default cached locator when enabled.
    pub fn new(source: P, config: &LocationConfig) -> Self {
        Self {
            source,
            options: PositionOptions::from(config),
            ip: config.use_ip.then(IpLocator::new),
            fallback: config.fallback(),
            fallback_label: config.label.clone(),
        }
    }

    /// Replace the IP locator (None disables the IP step)
    pub fn with_ip_locator(mut self, ip: Option<IpLocator>) -> Self {
        self.ip = ip;
        self
    }

    /// Resolve a coordinate; never fails
    pub async fn resolve(&self) -> Located {
        let attempt = tokio::time::timeout(
            self.options.timeout,
            self.source.current_position(&self.options),
        )
        .await
        .unwrap_or(Err(GeolocationError::Timeout));

        let err = match attempt {
            Ok(coords) => match coords.validate() {
                Ok(()) => {
                    debug!("Using device position {}", coords);
                    return Located {
                        coords,
                        source: LocationSource::Device,
                        notice: None,
                    };
                }
                Err(e) => {
                    warn!("Device reported {}", e);
                    GeolocationError::Unavailable
                }
            },
            Err(err) => err,
        };

        warn!("Geolocation failed: {}", err);
        let notice = Some(err.notice(&self.fallback_label));

        if let Some(ip) = &self.ip {
            match ip.locate().await {
                Ok(location) => {
                    debug!("Using IP location: {}", location.display_name);
                    return Located {
                        coords: Coordinates::new(location.lat, location.lng),
                        source: LocationSource::Ip,
                        notice: Some(format!(
                            "Device location unavailable ({}). Using approximate location near {}.",
                            err, location.display_name
                        )),
                    };
                }
                Err(e) => warn!("IP location failed: {}", e),
            }
        }

        debug!("Using default location {}", self.fallback);
        Located {
            coords: self.fallback,
            source: LocationSource::Default,
            notice,
        }
    }
}
