use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use weather_widget_core::{LocationInput, LocationRecord, StoreError};

use crate::error::ServerError;
use crate::state::AppState;

pub const LOCATION_CACHE_CONTROL: &str = "public, max-age=300, stale-while-revalidate=60";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/location", get(get_location).post(update_location))
}

/// `GET /api/location` - the stored record, verbatim.
pub async fn get_location(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let record = state.store.get().map_err(|source| ServerError::Storage {
        context: "Error fetching location data",
        source,
    })?;

    Ok(([(header::CACHE_CONTROL, LOCATION_CACHE_CONTROL)], Json(record)))
}

/// `POST /api/location` - replace the stored record.
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LocationInput>, JsonRejection>,
) -> Result<Json<LocationRecord>, ServerError> {
    let Json(input) = payload
        .map_err(|e| ServerError::BadRequest(format!("Invalid location payload: {}", e.body_text())))?;

    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let record = state.store.set(input).map_err(|source| match source {
        StoreError::Validation(field) => {
            ServerError::BadRequest(format!("Missing required fields: {field}"))
        }
        source => ServerError::Storage { context: "Error updating location data", source },
    })?;

    tracing::info!(city = %record.city, lat = record.latitude, lon = record.longitude, "location updated");
    Ok(Json(record))
}
