//! Shared application state
//!
//! All collaborators (record store, geocoding pipeline) are built once at
//! startup and handed to the handlers through axum's `State`, giving them
//! an explicit lifecycle instead of module-level globals.

use crate::config::HopeBitesConfig;
use crate::geocode::{FallbackCoordinator, GeocodeResolver, NominatimProvider};
use crate::store::RecordStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: HopeBitesConfig,
    pub store: RecordStore,
    pub coordinator: FallbackCoordinator,
}

impl AppState {
    /// Build the application state from validated configuration.
    pub fn new(config: HopeBitesConfig) -> Result<Arc<Self>> {
        let provider = NominatimProvider::new(&config.geocode, config.region.clone())?;
        let attempt_delay = Duration::from_millis(config.geocode.attempt_delay_ms);
        let resolver = GeocodeResolver::new(
            Arc::new(provider),
            config.region.clone(),
            attempt_delay,
        );
        let coordinator = FallbackCoordinator::new(resolver, attempt_delay);

        Ok(Arc::new(Self {
            config,
            store: RecordStore::new(),
            coordinator,
        }))
    }

    /// Delay between records during batch geocoding.
    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.config.geocode.batch_delay_ms)
    }
}
