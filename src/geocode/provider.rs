//! Geocoding provider client
//!
//! HTTP client for a Nominatim-compatible search endpoint. The provider is
//! behind a trait so the resolver can be exercised against a stub in tests.

use crate::config::GeocodeConfig;
use crate::geocode::{GeocodeError, RegionProfile};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One raw candidate from the provider, before validation.
///
/// Nominatim serializes coordinates as strings; parsing happens during
/// validation so a malformed candidate only costs itself, not the variant.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCandidate {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: HashMap<String, String>,
}

/// A geocoding provider resolving one query string to candidate matches.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ProviderCandidate>, GeocodeError>;
}

/// Client for a Nominatim-compatible `/search` endpoint
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    region: RegionProfile,
}

impl NominatimProvider {
    /// Create a new provider client with the configured request timeout.
    pub fn new(config: &GeocodeConfig, region: RegionProfile) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("HopeBites/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodeError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            region,
        })
    }

    fn search_url(&self, query: &str) -> String {
        let bounds = &self.region.bounds;
        // viewbox is x1,y1,x2,y2 (left, top, right, bottom)
        format!(
            "{}/search?q={}&format=json&addressdetails=1&limit=5&countrycodes={}&viewbox={},{},{},{}&bounded=1",
            self.base_url,
            urlencoding::encode(query),
            self.region.country_code,
            bounds.min_lng,
            bounds.max_lat,
            bounds.max_lng,
            bounds.min_lat,
        )
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    async fn search(&self, query: &str) -> Result<Vec<ProviderCandidate>, GeocodeError> {
        let url = self.search_url(query);
        debug!("Geocoding request: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Geocoding request for '{}' timed out", query);
                GeocodeError::Timeout
            } else if e.is_builder() {
                GeocodeError::Internal(e.to_string())
            } else {
                warn!("Geocoding request for '{}' failed: {}", query, e);
                GeocodeError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding provider returned HTTP {} for '{}'", status, query);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let candidates: Vec<ProviderCandidate> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        info!(
            "Geocoding provider returned {} candidate(s) for '{}'",
            candidates.len(),
            query
        );
        Ok(candidates)
    }
}
