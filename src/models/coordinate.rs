//! Resolved coordinate model
//!
//! The single value the pipeline hands back to callers. Either a verified
//! provider match, or the region's fixed default point with a synthetic
//! confidence marker.

use crate::geocode::{GeoResult, RegionProfile};
use serde::{Deserialize, Serialize};

/// Confidence attached to the default point when resolution exhausted every
/// variant and fallback address.
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Confidence attached to the default point when resolution was never
/// attempted (blank address) or aborted on an internal error.
pub const ERROR_CONFIDENCE: f64 = 0.0;

/// The externally visible output of address resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCoordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable name for the resolved point
    pub display_name: String,
    /// 0..=1; near 1 for verified matches, 0.1/0.0 for synthetic defaults
    pub confidence: f64,
    /// Whether the coordinate came from a verified provider match
    pub geocoded: bool,
}

impl ResolvedCoordinate {
    /// Wrap a validated provider hit.
    #[must_use]
    pub fn verified(result: GeoResult) -> Self {
        Self {
            latitude: result.latitude,
            longitude: result.longitude,
            display_name: result.display_name,
            confidence: result.confidence,
            geocoded: true,
        }
    }

    /// The region's fixed default point, tagged with a synthetic
    /// confidence marker.
    #[must_use]
    pub fn region_default(region: &RegionProfile, confidence: f64) -> Self {
        Self {
            latitude: region.default_latitude,
            longitude: region.default_longitude,
            display_name: region.default_label.clone(),
            confidence,
            geocoded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_verified_keeps_provider_fields() {
        let hit = GeoResult {
            latitude: 11.93,
            longitude: 79.83,
            display_name: "White Town, Puducherry, India".to_string(),
            confidence: 0.42,
            components: HashMap::new(),
        };
        let coordinate = ResolvedCoordinate::verified(hit);

        assert!(coordinate.geocoded);
        assert_eq!(coordinate.latitude, 11.93);
        assert_eq!(coordinate.confidence, 0.42);
        assert_eq!(coordinate.display_name, "White Town, Puducherry, India");
    }

    #[test]
    fn test_region_default_is_marked_synthetic() {
        let region = RegionProfile::default();
        let coordinate = ResolvedCoordinate::region_default(&region, FALLBACK_CONFIDENCE);

        assert!(!coordinate.geocoded);
        assert_eq!(coordinate.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(coordinate.latitude, region.default_latitude);
        assert_eq!(coordinate.longitude, region.default_longitude);
        assert_eq!(coordinate.display_name, "Puducherry, India");
    }
}
