//! Data models for the HopeBites backend
//!
//! - Coordinate: the pipeline's resolved output
//! - Records: donor, NGO, and food-item rows the controllers persist

pub mod coordinate;
pub mod records;

pub use coordinate::{ERROR_CONFIDENCE, FALLBACK_CONFIDENCE, ResolvedCoordinate};
pub use records::{Donor, FoodItem, Ngo};
