//! Demo-booking route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use tutorlane_core::{DemoBooking, DemoBookingCreate};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Submit a demo booking.
///
/// POST /api/demo-bookings
#[instrument(skip_all, fields(email = %input.email))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<DemoBookingCreate>,
) -> Result<Json<DemoBooking>> {
    let record = state.bookings().submit(input).await?;
    Ok(Json(record))
}

/// List demo bookings, newest first.
///
/// GET /api/demo-bookings
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DemoBooking>>> {
    let records = state.bookings().list().await?;
    Ok(Json(records))
}

/// Query parameters for a status update.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

/// Set the status of a booking.
///
/// PATCH /api/demo-bookings/{id}/status?status=confirmed
///
/// Any non-empty status string is accepted; unknown ids are a 404.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<serde_json::Value>> {
    if params.status.trim().is_empty() {
        return Err(AppError::BadRequest("status must not be empty".to_owned()));
    }

    let matched = state.bookings().update_status(&id, &params.status).await?;
    if !matched {
        return Err(AppError::NotFound("Booking".to_owned()));
    }

    Ok(Json(json!({ "message": "Status updated" })))
}

/// Delete a booking.
///
/// DELETE /api/demo-bookings/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state.bookings().delete(&id).await?;
    if !deleted {
        return Err(AppError::NotFound("Booking".to_owned()));
    }

    Ok(Json(json!({ "message": "Booking deleted" })))
}
