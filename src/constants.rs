//! Centralized constants for the trander crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;

    /// Latitude of the default location (Tokyo)
    pub const DEFAULT_LAT: f64 = 35.6762;

    /// Longitude of the default location (Tokyo)
    pub const DEFAULT_LNG: f64 = 139.6503;

    /// Label shown when the default location is used
    pub const DEFAULT_LABEL: &str = "Tokyo";
}

/// External API endpoints
pub mod api {
    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Google Places web service root
    pub const GOOGLE_PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place";

    /// Geoapify Places API
    pub const GEOAPIFY_URL: &str = "https://api.geoapify.com/v2";

    /// GeoDB Cities via RapidAPI (requires key)
    pub const GEODB_RAPIDAPI_URL: &str = "https://wft-geo-db.p.rapidapi.com/v1/geo";

    /// RapidAPI host header for GeoDB
    pub const GEODB_RAPIDAPI_HOST: &str = "wft-geo-db.p.rapidapi.com";

    /// GeoDB Cities free service (no key, rate limited)
    pub const GEODB_FREE_URL: &str = "http://geodb-free-service.wirefreethought.com/v1/geo";

    /// Placeholder images for places without photos
    pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/seed";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
