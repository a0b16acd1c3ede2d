//! In-process record store
//!
//! Stands in for the relational database behind the marketplace. The
//! pipeline's callers only need read-by-identity and coordinate-write
//! operations, so that is the whole surface. Constructed once at startup
//! and injected through `AppState`.

use crate::models::{Donor, FoodItem, Ngo};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Profile fields accepted for a donor upsert
#[derive(Debug, Clone)]
pub struct DonorProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
}

/// Profile fields accepted for an NGO upsert
#[derive(Debug, Clone)]
pub struct NgoProfile {
    pub name: String,
    pub email: String,
    pub registration_no: Option<String>,
    pub address: String,
}

/// Fields accepted for a food-item upload
#[derive(Debug, Clone)]
pub struct NewFoodItem {
    pub donor_email: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub pickup_address: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Keyed store for donor, NGO, and food records.
#[derive(Default)]
pub struct RecordStore {
    donors: RwLock<HashMap<u64, Donor>>,
    ngos: RwLock<HashMap<u64, Ngo>>,
    foods: RwLock<HashMap<u64, FoodItem>>,
    next_id: AtomicU64,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Create or update a donor profile, keyed by email.
    ///
    /// Updating the profile clears any previously stored coordinates; the
    /// caller re-resolves and writes them back.
    pub async fn upsert_donor(&self, profile: DonorProfile) -> Donor {
        let mut donors = self.donors.write().await;
        if let Some(existing) = donors.values_mut().find(|d| d.email == profile.email) {
            existing.name = profile.name;
            existing.phone = profile.phone;
            existing.address = profile.address;
            existing.latitude = None;
            existing.longitude = None;
            existing.geocoded = false;
            return existing.clone();
        }

        let donor = Donor {
            id: self.allocate_id(),
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            address: profile.address,
            latitude: None,
            longitude: None,
            geocoded: false,
            created_at: Utc::now(),
        };
        donors.insert(donor.id, donor.clone());
        donor
    }

    pub async fn find_donor_by_email(&self, email: &str) -> Option<Donor> {
        self.donors
            .read()
            .await
            .values()
            .find(|d| d.email == email)
            .cloned()
    }

    pub async fn find_donor(&self, id: u64) -> Option<Donor> {
        self.donors.read().await.get(&id).cloned()
    }

    pub async fn set_donor_coordinates(
        &self,
        id: u64,
        latitude: f64,
        longitude: f64,
        geocoded: bool,
    ) -> Option<Donor> {
        let mut donors = self.donors.write().await;
        let donor = donors.get_mut(&id)?;
        donor.latitude = Some(latitude);
        donor.longitude = Some(longitude);
        donor.geocoded = geocoded;
        Some(donor.clone())
    }

    pub async fn donors_missing_coordinates(&self) -> Vec<Donor> {
        let mut missing: Vec<Donor> = self
            .donors
            .read()
            .await
            .values()
            .filter(|d| d.missing_coordinates())
            .cloned()
            .collect();
        missing.sort_by_key(|d| d.id);
        missing
    }

    pub async fn upsert_ngo(&self, profile: NgoProfile) -> Ngo {
        let mut ngos = self.ngos.write().await;
        if let Some(existing) = ngos.values_mut().find(|n| n.email == profile.email) {
            existing.name = profile.name;
            existing.registration_no = profile.registration_no;
            existing.address = profile.address;
            existing.latitude = None;
            existing.longitude = None;
            existing.geocoded = false;
            return existing.clone();
        }

        let ngo = Ngo {
            id: self.allocate_id(),
            name: profile.name,
            email: profile.email,
            registration_no: profile.registration_no,
            address: profile.address,
            latitude: None,
            longitude: None,
            geocoded: false,
            created_at: Utc::now(),
        };
        ngos.insert(ngo.id, ngo.clone());
        ngo
    }

    pub async fn find_ngo_by_email(&self, email: &str) -> Option<Ngo> {
        self.ngos
            .read()
            .await
            .values()
            .find(|n| n.email == email)
            .cloned()
    }

    pub async fn set_ngo_coordinates(
        &self,
        id: u64,
        latitude: f64,
        longitude: f64,
        geocoded: bool,
    ) -> Option<Ngo> {
        let mut ngos = self.ngos.write().await;
        let ngo = ngos.get_mut(&id)?;
        ngo.latitude = Some(latitude);
        ngo.longitude = Some(longitude);
        ngo.geocoded = geocoded;
        Some(ngo.clone())
    }

    pub async fn insert_food(&self, item: NewFoodItem) -> FoodItem {
        let food = FoodItem {
            id: self.allocate_id(),
            donor_email: item.donor_email,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            pickup_address: item.pickup_address,
            latitude: None,
            longitude: None,
            geocoded: false,
            expires_at: item.expires_at,
            created_at: Utc::now(),
        };
        self.foods.write().await.insert(food.id, food.clone());
        food
    }

    pub async fn find_food(&self, id: u64) -> Option<FoodItem> {
        self.foods.read().await.get(&id).cloned()
    }

    pub async fn set_food_coordinates(
        &self,
        id: u64,
        latitude: f64,
        longitude: f64,
        geocoded: bool,
    ) -> Option<FoodItem> {
        let mut foods = self.foods.write().await;
        let food = foods.get_mut(&id)?;
        food.latitude = Some(latitude);
        food.longitude = Some(longitude);
        food.geocoded = geocoded;
        Some(food.clone())
    }

    pub async fn foods_missing_coordinates(&self) -> Vec<FoodItem> {
        let mut missing: Vec<FoodItem> = self
            .foods
            .read()
            .await
            .values()
            .filter(|f| f.missing_coordinates())
            .cloned()
            .collect();
        missing.sort_by_key(|f| f.id);
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: &str) -> DonorProfile {
        DonorProfile {
            name: "Le Cafe".to_string(),
            email: email.to_string(),
            phone: None,
            address: "Beach Road".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_donor_is_keyed_by_email() {
        let store = RecordStore::new();

        let first = store.upsert_donor(profile("lecafe@example.com")).await;
        let mut updated = profile("lecafe@example.com");
        updated.name = "Le Cafe Beachside".to_string();
        let second = store.upsert_donor(updated).await;

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Le Cafe Beachside");
        assert!(store.find_donor_by_email("lecafe@example.com").await.is_some());
    }

    #[tokio::test]
    async fn test_profile_update_clears_stale_coordinates() {
        let store = RecordStore::new();
        let donor = store.upsert_donor(profile("a@example.com")).await;
        store.set_donor_coordinates(donor.id, 11.93, 79.83, true).await;

        let updated = store.upsert_donor(profile("a@example.com")).await;
        assert!(updated.missing_coordinates());
        assert!(!updated.geocoded);
    }

    #[tokio::test]
    async fn test_set_coordinates_round_trips() {
        let store = RecordStore::new();
        let donor = store.upsert_donor(profile("a@example.com")).await;

        let updated = store
            .set_donor_coordinates(donor.id, 11.9338, 79.8298, true)
            .await
            .unwrap();
        assert_eq!(updated.latitude, Some(11.9338));
        assert_eq!(updated.longitude, Some(79.8298));
        assert!(updated.geocoded);

        assert!(store.set_donor_coordinates(9999, 0.0, 0.0, false).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_coordinates_listing_is_ordered() {
        let store = RecordStore::new();
        let a = store.upsert_donor(profile("a@example.com")).await;
        let b = store.upsert_donor(profile("b@example.com")).await;
        let c = store.upsert_donor(profile("c@example.com")).await;
        store.set_donor_coordinates(b.id, 11.93, 79.83, true).await;

        let missing = store.donors_missing_coordinates().await;
        assert_eq!(
            missing.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![a.id, c.id]
        );
    }

    #[tokio::test]
    async fn test_food_items_share_the_id_sequence() {
        let store = RecordStore::new();
        let donor = store.upsert_donor(profile("a@example.com")).await;
        let food = store
            .insert_food(NewFoodItem {
                donor_email: donor.email.clone(),
                name: "Veg biryani".to_string(),
                description: None,
                quantity: 12,
                pickup_address: "Beach Road".to_string(),
                expires_at: None,
            })
            .await;

        assert_ne!(donor.id, food.id);
        assert!(store.find_food(food.id).await.is_some());
        assert_eq!(store.foods_missing_coordinates().await.len(), 1);
    }
}
