//! HTTP route handlers for the lead-capture API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/                              - Hello root
//!
//! # Demo bookings
//! POST   /api/demo-bookings                 - Submit a booking
//! GET    /api/demo-bookings                 - List bookings, newest first
//! PATCH  /api/demo-bookings/{id}/status     - Set booking status (?status=)
//! DELETE /api/demo-bookings/{id}            - Delete a booking
//!
//! # Subject queries
//! POST   /api/subject-queries               - Submit a query
//! GET    /api/subject-queries               - List queries, newest first
//!
//! # Contact messages
//! POST   /api/contact-messages              - Submit a message
//! GET    /api/contact-messages              - List messages, newest first
//!
//! # Analytics & admin
//! POST   /api/visitors/track                - Record a visitor event
//! GET    /api/admin/stats                   - Aggregate counts
//! GET    /api/whatsapp-config               - WhatsApp number echo
//! ```

pub mod admin;
pub mod bookings;
pub mod contact;
pub mod subject_queries;
pub mod visitors;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

/// Hello root, kept for uptime probes pointed at the API prefix.
async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Static echo of the configured WhatsApp contact number.
async fn whatsapp_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "whatsapp_number": state.config().whatsapp_number }))
}

/// Create the demo-booking routes router.
pub fn booking_routes() -> Router<AppState> {
    use axum::routing::{delete, patch};

    Router::new()
        .route("/", post(bookings::create).get(bookings::list))
        .route("/{id}/status", patch(bookings::update_status))
        .route("/{id}", delete(bookings::delete))
}

/// Create the subject-query routes router.
pub fn subject_query_routes() -> Router<AppState> {
    Router::new().route("/", post(subject_queries::create).get(subject_queries::list))
}

/// Create the contact-message routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/", post(contact::create).get(contact::list))
}

/// Create all API routes, nested under `/api`.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/", get(hello))
        .nest("/demo-bookings", booking_routes())
        .nest("/subject-queries", subject_query_routes())
        .nest("/contact-messages", contact_routes())
        .route("/visitors/track", post(visitors::track))
        .route("/admin/stats", get(admin::stats))
        .route("/whatsapp-config", get(whatsapp_config));

    Router::new().nest("/api", api)
}
