//! Visitor-tracking route handlers.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;

use tutorlane_core::VisitorEventCreate;

use crate::services::TrackOutcome;
use crate::state::AppState;

/// Record a visitor lifecycle event.
///
/// POST /api/visitors/track
///
/// Analytics is lossy-acceptable: a failed write comes back as
/// `{"status": "error"}` with a 200, never a failed request.
#[instrument(skip_all, fields(session_id = %input.session_id, event_type = %input.event_type))]
pub async fn track(
    State(state): State<AppState>,
    Json(input): Json<VisitorEventCreate>,
) -> Json<serde_json::Value> {
    let status = match state.analytics().track(input).await {
        TrackOutcome::Tracked => "tracked",
        TrackOutcome::Error => "error",
    };
    Json(json!({ "status": status }))
}
