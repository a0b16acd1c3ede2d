//! Donor, NGO, and food-item records
//!
//! The durable records the controllers read and write. Coordinates are
//! optional until a resolution has run; `geocoded` distinguishes verified
//! matches from substituted defaults so the UI can flag approximate
//! locations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant donor profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoded: bool,
    pub created_at: DateTime<Utc>,
}

/// NGO profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ngo {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub registration_no: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoded: bool,
    pub created_at: DateTime<Utc>,
}

/// Surplus food listing with its pickup location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u64,
    pub donor_email: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub pickup_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoded: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Whether this record still needs a resolution pass.
    #[must_use]
    pub fn missing_coordinates(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }
}

impl Ngo {
    #[must_use]
    pub fn missing_coordinates(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }
}

impl FoodItem {
    #[must_use]
    pub fn missing_coordinates(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }
}
