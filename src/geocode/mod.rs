//! Address resolution pipeline
//!
//! This module turns free-text addresses into coordinates within the
//! platform's service region:
//! - `normalizer`: address cleanup and region-biased search variants
//! - `provider`: the external geocoding provider client
//! - `resolver`: sequential variant lookups with result validation
//! - `fallback`: the fallback ladder guaranteeing a usable coordinate

pub mod fallback;
pub mod normalizer;
pub mod provider;
pub mod resolver;

pub use fallback::FallbackCoordinator;
pub use provider::{GeocodeProvider, NominatimProvider, ProviderCandidate};
pub use resolver::GeocodeResolver;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while talking to the geocoding provider.
///
/// Transient kinds (timeout, network, status, invalid response) mean "this
/// variant failed" and are swallowed by the resolver. `Internal` indicates a
/// misconfiguration or programming fault and aborts the whole resolution.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Request exceeded the configured timeout
    #[error("geocoding request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("geocoding request failed: {0}")]
    Network(String),

    /// Provider answered with a non-success HTTP status
    #[error("geocoding provider returned HTTP {0}")]
    Status(u16),

    /// Provider answered with something that is not a candidate list
    #[error("unusable geocoding response: {0}")]
    InvalidResponse(String),

    /// Request could not even be issued (bad base URL and the like)
    #[error("internal geocoding error: {0}")]
    Internal(String),
}

impl GeocodeError {
    /// Whether this error should abort the resolution instead of moving on
    /// to the next variant.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, GeocodeError::Internal(_))
    }
}

/// A provider hit that passed bounding-box and region-name validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Provider display name for the match
    pub display_name: String,
    /// Provider importance score, clamped to 0..=1
    pub confidence: f64,
    /// Address component fields as returned by the provider
    pub components: HashMap<String, String>,
}

/// Rectangular lat/lng region used to reject out-of-area results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// The platform's service region.
///
/// Everything the pipeline knows about its target area lives here: the
/// accepted spellings, the qualifiers appended to search variants, the
/// bounding box, and the default point substituted when resolution fails.
/// The defaults reproduce the platform's home region (Puducherry, India).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionProfile {
    /// Current region name appended to search variants
    #[serde(default = "default_primary_name")]
    pub primary_name: String,
    /// Historical/alternate spelling accepted in provider results
    #[serde(default = "default_alternate_name")]
    pub alternate_name: String,
    /// Administrative-level qualifier for the widened variants
    #[serde(default = "default_admin_qualifier")]
    pub admin_qualifier: String,
    /// State qualifier used by the fallback ladder
    #[serde(default = "default_home_state")]
    pub home_state: String,
    /// Country name appended to search variants
    #[serde(default = "default_country")]
    pub country: String,
    /// ISO country code passed to the provider
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Service-area bounding box
    #[serde(default = "default_bounds")]
    pub bounds: BoundingBox,
    /// Latitude of the default point
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    /// Longitude of the default point
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    /// Display name attached to the default point
    #[serde(default = "default_label")]
    pub default_label: String,
}

fn default_primary_name() -> String {
    "Puducherry".to_string()
}

fn default_alternate_name() -> String {
    "Pondicherry".to_string()
}

fn default_admin_qualifier() -> String {
    "Puducherry district".to_string()
}

fn default_home_state() -> String {
    "Puducherry".to_string()
}

fn default_country() -> String {
    "India".to_string()
}

fn default_country_code() -> String {
    "in".to_string()
}

fn default_bounds() -> BoundingBox {
    BoundingBox {
        min_lat: 11.70,
        max_lat: 12.15,
        min_lng: 79.55,
        max_lng: 80.05,
    }
}

fn default_latitude() -> f64 {
    11.9416
}

fn default_longitude() -> f64 {
    79.8083
}

fn default_label() -> String {
    "Puducherry, India".to_string()
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self {
            primary_name: default_primary_name(),
            alternate_name: default_alternate_name(),
            admin_qualifier: default_admin_qualifier(),
            home_state: default_home_state(),
            country: default_country(),
            country_code: default_country_code(),
            bounds: default_bounds(),
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_label: default_label(),
        }
    }
}

impl RegionProfile {
    /// Check whether `text` mentions the region under any accepted spelling.
    #[must_use]
    pub fn matches_name(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        lowered.contains(&self.primary_name.to_lowercase())
            || lowered.contains(&self.alternate_name.to_lowercase())
    }

    /// The fixed default point for this region.
    #[must_use]
    pub fn default_point(&self) -> (f64, f64) {
        (self.default_latitude, self.default_longitude)
    }
}
