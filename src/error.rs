//! Error types for trander

use thiserror::Error;

/// Why the device could not report a position
///
/// Only ever surfaced as a notice; the locator always falls back to
/// some coordinate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    Unavailable,

    #[error("timed out")]
    Timeout,

    #[error("geolocation unsupported")]
    Unsupported,
}

impl GeolocationError {
    /// Human-readable notice naming the fallback location
    pub fn notice(&self, fallback_label: &str) -> String {
        match self {
            Self::PermissionDenied => format!(
                "Location access denied. Using {} as default location. \
                 You can use worldwide search to explore other areas.",
                fallback_label
            ),
            Self::Unavailable => {
                format!("Location unavailable. Using {} as default location.", fallback_label)
            }
            Self::Timeout => format!(
                "Location request timed out. Using {} as default location.",
                fallback_label
            ),
            Self::Unsupported => format!(
                "This device does not support geolocation. Using {} as default location.",
                fallback_label
            ),
        }
    }
}

/// Main error type for trander operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("{service} request failed{}: {message}", status_suffix(.status))]
    SearchService {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("No cities found in this country ({0})")]
    NoCitiesFound(String),

    #[error("No places found nearby")]
    NoPlacesFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a service error from a non-success HTTP response
    pub fn service(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::SearchService {
            service,
            status: Some(status),
            message: message.into(),
        }
    }

    /// True when the request never produced an HTTP response
    ///
    /// A response whose body could not be decoded counts as a service error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(e) if !e.is_decode())
    }

    /// HTTP status reported by an upstream service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SearchService { status, .. } => *status,
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// Result type alias for trander operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = Error::service("Google Places", 403, "REQUEST_DENIED");
        assert_eq!(err.to_string(), "Google Places request failed (403): REQUEST_DENIED");
        assert_eq!(err.status(), Some(403));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_service_error_without_status() {
        let err = Error::SearchService {
            service: "Geoapify",
            status: None,
            message: "bad payload".to_string(),
        };
        assert_eq!(err.to_string(), "Geoapify request failed: bad payload");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_geolocation_notice_names_fallback() {
        let notice = GeolocationError::PermissionDenied.notice("Tokyo");
        assert!(notice.starts_with("Location access denied. Using Tokyo"));
        assert!(GeolocationError::Timeout.notice("Oslo").contains("Oslo"));
    }
}
