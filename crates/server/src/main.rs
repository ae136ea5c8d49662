//! TutorLane backend binary.
//!
//! Serves the lead-capture API for the marketing site.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in/out, routes under `/api`
//! - Swappable persistence: in-memory document store or Supabase REST
//! - Best-effort SMTP staff notifications, detached from the request path
//! - Sentry + tracing for error capture and structured logs

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorlane_server::app;
use tutorlane_server::config::{Config, StoreConfig};
use tutorlane_server::services::{DeepLinks, Notifier};
use tutorlane_server::state::AppState;
use tutorlane_server::store::{MemoryStore, Store, SupabaseStore};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tutorlane_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Construct the persistence backend
    let store: Arc<dyn Store> = match &config.store {
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory store; data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
        StoreConfig::Supabase(supabase) => Arc::new(
            SupabaseStore::new(supabase).expect("Failed to create Supabase client"),
        ),
    };

    // Construct the notifier; missing SMTP config is a normal state
    if config.smtp.is_none() {
        tracing::warn!("SMTP not configured; staff notifications disabled");
    }
    let links = DeepLinks {
        whatsapp_number: config.whatsapp_number.clone(),
    };
    let notifier =
        Notifier::new(config.smtp.as_ref(), links).expect("Failed to configure SMTP notifier");

    // Build application state and router
    let state = AppState::new(config.clone(), store, notifier);
    let app = app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("tutorlane-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight notification tasks may be abandoned at this point; that loss
/// is accepted.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
