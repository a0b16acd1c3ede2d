//! Fallback ladder over the resolver
//!
//! Controllers must always end up with a storable coordinate, no matter how
//! the provider behaves. The ladder tries the raw address first, then a
//! short list of increasingly generic reformulations, and finally
//! substitutes the region's fixed default point. Exhaustion and internal
//! errors are tagged with distinct confidence markers (0.1 vs 0.0) so the
//! two outcomes stay distinguishable downstream.

use crate::geocode::{GeoResult, GeocodeError, GeocodeResolver, RegionProfile};
use crate::models::{ERROR_CONFIDENCE, FALLBACK_CONFIDENCE, ResolvedCoordinate};
use std::time::Duration;
use tracing::{error, info, warn};

/// Wraps [`GeocodeResolver`] with the fallback ladder.
///
/// `resolve*` never fails and never returns an absent coordinate; the worst
/// outcome is the region default with a low confidence marker.
pub struct FallbackCoordinator {
    resolver: GeocodeResolver,
    attempt_delay: Duration,
}

impl FallbackCoordinator {
    pub fn new(resolver: GeocodeResolver, attempt_delay: Duration) -> Self {
        Self {
            resolver,
            attempt_delay,
        }
    }

    #[must_use]
    pub fn region(&self) -> &RegionProfile {
        self.resolver.region()
    }

    /// Controller entry point.
    ///
    /// A blank address receives the region default directly — the ladder is
    /// never entered and no network call is made.
    pub async fn resolve_or_default(&self, raw_address: &str) -> ResolvedCoordinate {
        if raw_address.trim().is_empty() {
            return ResolvedCoordinate::region_default(self.region(), ERROR_CONFIDENCE);
        }
        self.resolve(raw_address).await
    }

    /// Resolve with the region's default city/state qualifiers.
    pub async fn resolve(&self, raw_address: &str) -> ResolvedCoordinate {
        self.resolve_with_overrides(raw_address, None, None).await
    }

    /// Resolve with explicit city/state override qualifiers for the
    /// fallback formulations.
    pub async fn resolve_with_overrides(
        &self,
        raw_address: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> ResolvedCoordinate {
        match self.try_ladder(raw_address, city, state).await {
            Ok(Some(hit)) => ResolvedCoordinate::verified(hit),
            Ok(None) => {
                warn!(
                    "No verified coordinate for '{}', substituting the region default",
                    raw_address.trim()
                );
                ResolvedCoordinate::region_default(self.region(), FALLBACK_CONFIDENCE)
            }
            Err(err) => {
                error!("Address resolution aborted for '{}': {}", raw_address.trim(), err);
                ResolvedCoordinate::region_default(self.region(), ERROR_CONFIDENCE)
            }
        }
    }

    async fn try_ladder(
        &self,
        raw_address: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<GeoResult>, GeocodeError> {
        let raw = raw_address.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if let Some(hit) = self.resolver.resolve(raw).await? {
            return Ok(Some(hit));
        }

        for (index, alternate) in fallback_addresses(raw, city, state, self.region())
            .iter()
            .enumerate()
        {
            tokio::time::sleep(self.attempt_delay).await;
            info!("Fallback attempt {}: '{}'", index + 1, alternate);
            if let Some(hit) = self.resolver.resolve(alternate).await? {
                return Ok(Some(hit));
            }
        }

        Ok(None)
    }
}

/// The ordered alternate formulations tried after the raw address fails.
fn fallback_addresses(
    raw: &str,
    city: Option<&str>,
    state: Option<&str>,
    region: &RegionProfile,
) -> Vec<String> {
    let city = city.unwrap_or(&region.primary_name);
    let state = state.unwrap_or(&region.home_state);
    let first_segment = raw.split(',').next().unwrap_or(raw).trim();

    vec![
        format!("{raw}, {city}"),
        format!("{raw}, {}", region.alternate_name),
        format!("{raw}, {city}, {state}"),
        format!("{first_segment}, {city}"),
    ]
}
