//! HTTP controllers
//!
//! The call sites that feed addresses into the resolution pipeline and
//! persist the returned coordinates: donor/NGO profile upserts, food-item
//! upload, and the batch geocode-missing maintenance endpoints. Geocoding
//! can never fail a request here — the pipeline always hands back some
//! coordinate, and the `geocoded` flag in the payload tells clients
//! whether it is verified or approximate.

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::models::{Donor, FoodItem, Ngo, ResolvedCoordinate};
use crate::state::AppState;
use crate::store::{DonorProfile, NewFoodItem, NgoProfile};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct DonorProfileRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct DonorProfileResponse {
    pub donor: Donor,
    pub location: ResolvedCoordinate,
    pub geocoded: bool,
}

#[derive(Debug, Deserialize)]
pub struct NgoProfileRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub registration_no: Option<String>,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct NgoProfileResponse {
    pub ngo: Ngo,
    pub location: ResolvedCoordinate,
    pub geocoded: bool,
}

#[derive(Debug, Deserialize)]
pub struct FoodUploadRequest {
    pub donor_email: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct FoodUploadResponse {
    pub food: FoodItem,
    pub location: ResolvedCoordinate,
    pub geocoded: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchGeocodeResponse {
    pub processed: usize,
    pub geocoded: usize,
    pub defaulted: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/donors/profile", post(update_donor_profile))
        .route("/ngos/profile", post(update_ngo_profile))
        .route("/foods", post(upload_food))
        .route("/admin/geocode/donors", post(geocode_missing_donors))
        .route("/admin/geocode/foods", post(geocode_missing_foods))
        .with_state(state)
}

async fn update_donor_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DonorProfileRequest>,
) -> Result<Json<DonorProfileResponse>, ApiError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(ApiError::MalformedPayload(
            "name and email are required".to_string(),
        ));
    }

    let donor = state
        .store
        .upsert_donor(DonorProfile {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone,
            address: payload.address.trim().to_string(),
        })
        .await;

    let location = state.coordinator.resolve_or_default(&donor.address).await;
    let donor = state
        .store
        .set_donor_coordinates(donor.id, location.latitude, location.longitude, location.geocoded)
        .await
        .unwrap_or(donor);

    info!(
        "Donor '{}' located at ({:.4}, {:.4}), geocoded={}",
        donor.email, location.latitude, location.longitude, location.geocoded
    );

    Ok(Json(DonorProfileResponse {
        donor,
        geocoded: location.geocoded,
        location,
    }))
}

async fn update_ngo_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NgoProfileRequest>,
) -> Result<Json<NgoProfileResponse>, ApiError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(ApiError::MalformedPayload(
            "name and email are required".to_string(),
        ));
    }

    let ngo = state
        .store
        .upsert_ngo(NgoProfile {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            registration_no: payload.registration_no,
            address: payload.address.trim().to_string(),
        })
        .await;

    let location = state.coordinator.resolve_or_default(&ngo.address).await;
    let ngo = state
        .store
        .set_ngo_coordinates(ngo.id, location.latitude, location.longitude, location.geocoded)
        .await
        .unwrap_or(ngo);

    Ok(Json(NgoProfileResponse {
        ngo,
        geocoded: location.geocoded,
        location,
    }))
}

async fn upload_food(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FoodUploadRequest>,
) -> Result<Json<FoodUploadResponse>, ApiError> {
    if payload.name.trim().is_empty() || payload.donor_email.trim().is_empty() {
        return Err(ApiError::MalformedPayload(
            "food name and donor email are required".to_string(),
        ));
    }
    if payload.quantity == 0 {
        return Err(ApiError::MalformedPayload(
            "quantity must be at least 1".to_string(),
        ));
    }

    let food = state
        .store
        .insert_food(NewFoodItem {
            donor_email: payload.donor_email.trim().to_string(),
            name: payload.name.trim().to_string(),
            description: payload.description,
            quantity: payload.quantity,
            pickup_address: payload.pickup_address.trim().to_string(),
            expires_at: payload.expires_at,
        })
        .await;

    let location = state
        .coordinator
        .resolve_or_default(&food.pickup_address)
        .await;
    let food = state
        .store
        .set_food_coordinates(food.id, location.latitude, location.longitude, location.geocoded)
        .await
        .unwrap_or(food);

    info!(
        "Food item '{}' located at ({:.4}, {:.4}), geocoded={}",
        food.name, location.latitude, location.longitude, location.geocoded
    );

    Ok(Json(FoodUploadResponse {
        food,
        geocoded: location.geocoded,
        location,
    }))
}

/// Re-resolve every donor still missing coordinates, one record at a time.
///
/// Records are processed strictly sequentially with a configured pause
/// between them to keep batch load within the provider's rate limits.
async fn geocode_missing_donors(
    State(state): State<Arc<AppState>>,
) -> Json<BatchGeocodeResponse> {
    let missing = state.store.donors_missing_coordinates().await;
    let total = missing.len();
    info!("Batch geocoding {} donor(s) missing coordinates", total);

    let mut geocoded = 0;
    let mut defaulted = 0;
    for (index, donor) in missing.into_iter().enumerate() {
        let location = state.coordinator.resolve_or_default(&donor.address).await;
        if location.geocoded {
            geocoded += 1;
        } else {
            defaulted += 1;
        }
        state
            .store
            .set_donor_coordinates(donor.id, location.latitude, location.longitude, location.geocoded)
            .await;

        if index + 1 < total {
            tokio::time::sleep(state.batch_delay()).await;
        }
    }

    Json(BatchGeocodeResponse {
        processed: total,
        geocoded,
        defaulted,
    })
}

/// Re-resolve every food item still missing coordinates.
async fn geocode_missing_foods(
    State(state): State<Arc<AppState>>,
) -> Json<BatchGeocodeResponse> {
    let missing = state.store.foods_missing_coordinates().await;
    let total = missing.len();
    info!("Batch geocoding {} food item(s) missing coordinates", total);

    let mut geocoded = 0;
    let mut defaulted = 0;
    for (index, food) in missing.into_iter().enumerate() {
        let location = state
            .coordinator
            .resolve_or_default(&food.pickup_address)
            .await;
        if location.geocoded {
            geocoded += 1;
        } else {
            defaulted += 1;
        }
        state
            .store
            .set_food_coordinates(food.id, location.latitude, location.longitude, location.geocoded)
            .await;

        if index + 1 < total {
            tokio::time::sleep(state.batch_delay()).await;
        }
    }

    Json(BatchGeocodeResponse {
        processed: total,
        geocoded,
        defaulted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_maps_to_bad_request() {
        let response = ApiError::MalformedPayload("name and email are required".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_donor_request_defaults_optional_fields() {
        let payload: DonorProfileRequest =
            serde_json::from_str(r#"{"name": "Le Cafe", "email": "a@example.com"}"#).unwrap();
        assert!(payload.phone.is_none());
        assert_eq!(payload.address, "");
    }

    #[test]
    fn test_food_request_requires_quantity() {
        let result = serde_json::from_str::<FoodUploadRequest>(
            r#"{"donor_email": "a@example.com", "name": "Rice"}"#,
        );
        assert!(result.is_err());
    }
}
