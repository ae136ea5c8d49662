//! Application state shared across handlers.

use std::sync::Arc;

use tutorlane_core::{ContactMessageCreate, DemoBookingCreate, SubjectQueryCreate};

use crate::config::Config;
use crate::services::{Analytics, LeadService, Notifier};
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store and notifier are injected at
/// construction; nothing in here is a process-global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<dyn Store>,
    notifier: Notifier,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn Store>, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the persistence backend.
    #[must_use]
    pub fn store(&self) -> Arc<dyn Store> {
        self.inner.store.clone()
    }

    /// Submission service for demo bookings.
    #[must_use]
    pub fn bookings(&self) -> LeadService<DemoBookingCreate> {
        LeadService::new(self.store(), self.inner.notifier.clone())
    }

    /// Submission service for subject queries.
    #[must_use]
    pub fn subject_queries(&self) -> LeadService<SubjectQueryCreate> {
        LeadService::new(self.store(), self.inner.notifier.clone())
    }

    /// Submission service for contact messages.
    #[must_use]
    pub fn contact_messages(&self) -> LeadService<ContactMessageCreate> {
        LeadService::new(self.store(), self.inner.notifier.clone())
    }

    /// Visitor analytics sink and aggregator.
    #[must_use]
    pub fn analytics(&self) -> Analytics {
        Analytics::new(self.store())
    }
}
