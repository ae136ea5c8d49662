//! Admin dashboard route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::services::AdminStats;
use crate::state::AppState;

/// Aggregate counts for the admin dashboard.
///
/// GET /api/admin/stats
///
/// Zero-fills the whole payload if the store is unreachable; the dashboard
/// never sees a partially-consistent snapshot.
#[instrument(skip_all)]
pub async fn stats(State(state): State<AppState>) -> Json<AdminStats> {
    Json(state.analytics().stats().await)
}
