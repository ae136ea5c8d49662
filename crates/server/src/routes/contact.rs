//! Contact-message route handlers.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;

use tutorlane_core::{ContactMessage, ContactMessageCreate};

use crate::error::Result;
use crate::state::AppState;

/// Submit a contact message.
///
/// POST /api/contact-messages
///
/// The caller learns the record was saved (`status: sent`) and its id; the
/// staff notification outcome is never visible here.
#[instrument(skip_all, fields(email = %input.email))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ContactMessageCreate>,
) -> Result<Json<serde_json::Value>> {
    let record = state.contact_messages().submit(input).await?;
    Ok(Json(json!({ "status": "sent", "id": record.id })))
}

/// List contact messages, newest first.
///
/// GET /api/contact-messages
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let records = state.contact_messages().list().await?;
    Ok(Json(records))
}
