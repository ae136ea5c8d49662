//! Subject-query route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use tutorlane_core::{SubjectQuery, SubjectQueryCreate};

use crate::error::Result;
use crate::state::AppState;

/// Submit a subject query.
///
/// POST /api/subject-queries
#[instrument(skip_all, fields(email = %input.email, subject = %input.subject))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<SubjectQueryCreate>,
) -> Result<Json<SubjectQuery>> {
    let record = state.subject_queries().submit(input).await?;
    Ok(Json(record))
}

/// List subject queries, newest first.
///
/// GET /api/subject-queries
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SubjectQuery>>> {
    let records = state.subject_queries().list().await?;
    Ok(Json(records))
}
