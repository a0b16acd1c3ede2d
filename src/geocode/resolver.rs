//! Sequential variant resolution with result validation
//!
//! Variants are tried strictly in order, never in parallel: the ordering
//! encodes a trust ranking from most to least specific, and the provider
//! expects polite request pacing. A candidate is accepted only when its
//! coordinates sit inside the service-area bounding box AND its display
//! name or address components mention the region under an accepted
//! spelling. Providers happily return plausible-looking matches from the
//! wrong end of the country for short place names; requiring both numeric
//! and textual agreement trades recall for precision, and the fallback
//! ladder covers the recall loss.

use crate::geocode::normalizer::AddressNormalizer;
use crate::geocode::{GeoResult, GeocodeError, GeocodeProvider, ProviderCandidate, RegionProfile};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves one address to a validated coordinate by trying search
/// variants in priority order.
pub struct GeocodeResolver {
    provider: Arc<dyn GeocodeProvider>,
    region: RegionProfile,
    attempt_delay: Duration,
}

impl GeocodeResolver {
    pub fn new(
        provider: Arc<dyn GeocodeProvider>,
        region: RegionProfile,
        attempt_delay: Duration,
    ) -> Self {
        Self {
            provider,
            region,
            attempt_delay,
        }
    }

    #[must_use]
    pub fn region(&self) -> &RegionProfile {
        &self.region
    }

    /// Resolve an address to the first provider candidate passing
    /// validation.
    ///
    /// Returns `Ok(None)` when every variant is exhausted without a valid
    /// hit. Blank input short-circuits to `Ok(None)` without any network
    /// call. Transient provider failures (timeout, connection error,
    /// unusable response) abandon the current variant and move on; only
    /// [`GeocodeError::is_fatal`] errors propagate.
    pub async fn resolve(&self, raw_address: &str) -> Result<Option<GeoResult>, GeocodeError> {
        let raw = raw_address.trim();
        if raw.is_empty() {
            debug!("Empty address, skipping geocoding");
            return Ok(None);
        }

        let variants = AddressNormalizer::variants(raw, &self.region);
        let last = variants.len() - 1;

        for (index, variant) in variants.iter().enumerate() {
            debug!("Trying variant {}/{}: '{}'", index + 1, variants.len(), variant);

            match self.provider.search(variant).await {
                Ok(candidates) => {
                    if let Some(hit) = self.first_valid(&candidates) {
                        info!(
                            "Resolved '{}' to ({:.4}, {:.4}) via variant {}",
                            raw,
                            hit.latitude,
                            hit.longitude,
                            index + 1
                        );
                        return Ok(Some(hit));
                    }
                    debug!(
                        "No valid candidate among {} result(s) for variant {}",
                        candidates.len(),
                        index + 1
                    );
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!("Variant {} failed: {}", index + 1, err);
                }
            }

            if index < last {
                tokio::time::sleep(self.attempt_delay).await;
            }
        }

        info!("All variants exhausted for '{}'", raw);
        Ok(None)
    }

    /// Pick the first candidate passing both validation checks, in
    /// provider-returned order.
    fn first_valid(&self, candidates: &[ProviderCandidate]) -> Option<GeoResult> {
        for candidate in candidates {
            let (Ok(lat), Ok(lng)) = (candidate.lat.parse::<f64>(), candidate.lon.parse::<f64>())
            else {
                debug!(
                    "Discarding candidate with unparseable coordinates: '{}'/'{}'",
                    candidate.lat, candidate.lon
                );
                continue;
            };

            if !self.region.bounds.contains(lat, lng) {
                debug!(
                    "Discarding out-of-bounds candidate ({:.4}, {:.4}): {}",
                    lat, lng, candidate.display_name
                );
                continue;
            }

            let name_matches = self.region.matches_name(&candidate.display_name)
                || candidate
                    .address
                    .values()
                    .any(|component| self.region.matches_name(component));
            if !name_matches {
                debug!(
                    "Discarding candidate without a region name match: {}",
                    candidate.display_name
                );
                continue;
            }

            return Some(GeoResult {
                latitude: lat,
                longitude: lng,
                display_name: candidate.display_name.clone(),
                confidence: candidate.importance.unwrap_or(0.5).clamp(0.0, 1.0),
                components: candidate.address.clone(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::BoundingBox;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub provider returning the same canned response for every query
    /// while counting calls.
    struct StubProvider {
        calls: AtomicUsize,
        response: Result<Vec<ProviderCandidate>, ()>,
    }

    impl StubProvider {
        fn with_candidates(candidates: Vec<ProviderCandidate>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(candidates),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for StubProvider {
        async fn search(&self, _query: &str) -> Result<Vec<ProviderCandidate>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(candidates) => Ok(candidates.clone()),
                Err(()) => Err(GeocodeError::Network("connection refused".into())),
            }
        }
    }

    fn candidate(lat: &str, lon: &str, display_name: &str) -> ProviderCandidate {
        ProviderCandidate {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: display_name.to_string(),
            importance: Some(0.4),
            address: HashMap::new(),
        }
    }

    fn resolver(provider: Arc<StubProvider>) -> GeocodeResolver {
        GeocodeResolver::new(provider, RegionProfile::default(), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_first_variant_hit_short_circuits() {
        let provider = Arc::new(StubProvider::with_candidates(vec![candidate(
            "11.93",
            "79.83",
            "24 Rue Dumas, White Town, Puducherry, India",
        )]));
        let result = resolver(provider.clone())
            .resolve("24 Rue Dumas, White Town")
            .await
            .unwrap()
            .expect("expected a hit");

        assert_eq!(result.latitude, 11.93);
        assert_eq!(result.longitude, 79.83);
        // Variant #1 matched, so variants #2..=#7 must never reach the
        // provider.
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_bounds_candidate_is_rejected() {
        // A confident match in New Delhi: numerically fine, regionally wrong.
        let provider = Arc::new(StubProvider::with_candidates(vec![candidate(
            "28.6139",
            "77.2090",
            "Connaught Place, New Delhi, Puducherry Colony, India",
        )]));
        let result = resolver(provider.clone()).resolve("Connaught Place").await.unwrap();

        assert!(result.is_none());
        assert_eq!(provider.calls(), crate::geocode::normalizer::VARIANT_COUNT);
    }

    #[tokio::test]
    async fn test_in_bounds_wrong_region_name_is_rejected() {
        let provider = Arc::new(StubProvider::with_candidates(vec![candidate(
            "11.93",
            "79.83",
            "Some Street, Villupuram, Tamil Nadu, India",
        )]));
        let result = resolver(provider).resolve("Some Street").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_region_match_via_address_components() {
        let mut c = candidate("11.93", "79.83", "Rue Dumas, 605001, India");
        c.address.insert("state".to_string(), "Pondicherry".to_string());
        let provider = Arc::new(StubProvider::with_candidates(vec![c]));

        let result = resolver(provider).resolve("Rue Dumas").await.unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_first_valid_candidate_wins_within_a_variant() {
        let provider = Arc::new(StubProvider::with_candidates(vec![
            candidate("28.61", "77.20", "New Delhi, India"),
            candidate("not-a-number", "79.83", "Puducherry, India"),
            candidate("11.91", "79.81", "Nellithope, Puducherry, India"),
            candidate("11.95", "79.82", "Muthialpet, Puducherry, India"),
        ]));
        let result = resolver(provider.clone())
            .resolve("Nellithope")
            .await
            .unwrap()
            .expect("expected a hit");

        // First two candidates fail validation; the third is accepted and
        // the fourth never considered.
        assert_eq!(result.latitude, 11.91);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_address_makes_no_network_call() {
        let provider = Arc::new(StubProvider::failing());
        for raw in ["", "   ", "\t\n"] {
            let result = resolver(provider.clone()).resolve(raw).await.unwrap();
            assert!(result.is_none());
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_transient_errors_exhaust_all_variants() {
        let provider = Arc::new(StubProvider::failing());
        let result = resolver(provider.clone()).resolve("Beach Road").await.unwrap();

        assert!(result.is_none());
        assert_eq!(provider.calls(), crate::geocode::normalizer::VARIANT_COUNT);
    }

    #[tokio::test]
    async fn test_confidence_is_clamped() {
        let mut c = candidate("11.93", "79.83", "White Town, Puducherry, India");
        c.importance = Some(3.2);
        let provider = Arc::new(StubProvider::with_candidates(vec![c]));

        let result = resolver(provider).resolve("White Town").await.unwrap().unwrap();
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_out_of_bounds_rejected_even_when_sole_candidate() {
        let region = RegionProfile {
            bounds: BoundingBox {
                min_lat: 11.70,
                max_lat: 12.15,
                min_lng: 79.55,
                max_lng: 80.05,
            },
            ..RegionProfile::default()
        };
        let provider = Arc::new(StubProvider::with_candidates(vec![candidate(
            "13.0827",
            "80.2707",
            "Chennai, Puducherry Nagar, India",
        )]));
        let resolver = GeocodeResolver::new(provider, region, Duration::ZERO);
        assert!(resolver.resolve("Puducherry Nagar").await.unwrap().is_none());
    }
}
