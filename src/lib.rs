//! HopeBites - surplus-food donation marketplace backend
//!
//! This library provides the address resolution and food-item geolocation
//! pipeline together with the record store and HTTP controllers that
//! consume it.

pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod state;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::HopeBitesConfig;
pub use error::HopeBitesError;
pub use geocode::{
    FallbackCoordinator, GeocodeProvider, GeocodeResolver, NominatimProvider, RegionProfile,
};
pub use models::{Donor, FoodItem, Ngo, ResolvedCoordinate};
pub use state::AppState;
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
