//! Shared helpers for TutorLane integration tests.
//!
//! Builds the full application router over the in-memory store so tests
//! exercise the real pipeline (routing, extraction, services, persistence)
//! without a network or a database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tutorlane_server::config::{Config, SmtpConfig, StoreConfig};
use tutorlane_server::services::{DeepLinks, Notifier};
use tutorlane_server::state::AppState;
use tutorlane_server::store::MemoryStore;

/// A config that binds nowhere and talks to nothing.
#[must_use]
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().expect("valid IP"),
        port: 0,
        store: StoreConfig::Memory,
        smtp: None,
        whatsapp_number: "919876543210".to_owned(),
        cors_origins: vec!["*".to_owned()],
        sentry_dsn: None,
    }
}

/// The full application router over a fresh in-memory store.
#[must_use]
pub fn test_app() -> Router {
    test_app_with_notifier(Notifier::disabled())
}

/// The full application router with a specific notifier.
#[must_use]
pub fn test_app_with_notifier(notifier: Notifier) -> Router {
    let state = AppState::new(test_config(), Arc::new(MemoryStore::new()), notifier);
    tutorlane_server::app(state)
}

/// A notifier wired to an SMTP relay that will refuse every connection.
///
/// Sends fail in the detached task; the request path must not notice.
#[must_use]
pub fn failing_notifier() -> Notifier {
    let smtp = SmtpConfig {
        host: "127.0.0.1".to_owned(),
        port: 1,
        username: "staff".to_owned(),
        password: secrecy::SecretString::from("not-a-password".to_owned()),
        from_address: "noreply@tutorlane.in".to_owned(),
        to_address: "staff@tutorlane.in".to_owned(),
    };
    Notifier::new(
        Some(&smtp),
        DeepLinks {
            whatsapp_number: String::new(),
        },
    )
    .expect("notifier builds")
}

/// Send a request through the router and decode the response.
///
/// Returns the status and the JSON body (`Value::Null` for non-JSON
/// bodies such as `/health`).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("infallible router");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Build a GET request.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Build a JSON request with the given method.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Build a bodyless request with the given method (PATCH, DELETE).
#[must_use]
pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
