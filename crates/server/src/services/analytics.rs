//! Visitor analytics: append-only ingestion and the admin aggregate view.
//!
//! Tracking is lossy-acceptable: a failed write degrades to an `error`
//! status flag for the client instead of a failed request. The aggregator
//! is read-only and zero-fills the entire stats payload if any sub-query
//! fails, so the admin view never shows a partially-consistent snapshot.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use tutorlane_core::{
    ContactMessageCreate, DemoBooking, DemoBookingCreate, LeadForm, SubjectQueryCreate,
    VisitorEventCreate, analytics, leads::STATUS_PENDING,
};

use crate::store::{Filter, Store, StoreError};

/// How many recent bookings the admin dashboard shows.
const RECENT_BOOKINGS: usize = 5;

/// Outcome of a tracking call, reported to the client as a status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Tracked,
    Error,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminStats {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub total_visits: u64,
    pub total_leaves: u64,
    pub total_queries: u64,
    pub total_contacts: u64,
    pub recent_bookings: Vec<DemoBooking>,
}

/// Visitor-event sink and admin aggregator.
pub struct Analytics {
    store: Arc<dyn Store>,
}

impl Analytics {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append a visitor event.
    ///
    /// Assigns a fresh id and server timestamp; accepts any `event_type`
    /// string. A store failure is logged and reported as
    /// [`TrackOutcome::Error`] rather than propagated.
    pub async fn track(&self, input: VisitorEventCreate) -> TrackOutcome {
        let event = input.into_event(Uuid::new_v4().to_string(), Utc::now());

        let document = match serde_json::to_value(&event) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize visitor event");
                return TrackOutcome::Error;
            }
        };

        match self.store.insert(analytics::COLLECTION, document).await {
            Ok(()) => TrackOutcome::Tracked,
            Err(e) => {
                tracing::error!(error = %e, session_id = %event.session_id, "Failed to track visitor event");
                TrackOutcome::Error
            }
        }
    }

    /// Aggregate counts across collections.
    ///
    /// Each field is an independent count query. If any of them fails the
    /// whole payload zero-fills (logged at error level).
    pub async fn stats(&self) -> AdminStats {
        match self.try_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(error = %e, "Failed to aggregate admin stats, zero-filling");
                AdminStats::default()
            }
        }
    }

    async fn try_stats(&self) -> Result<AdminStats, StoreError> {
        let bookings = DemoBookingCreate::COLLECTION;
        let events = analytics::COLLECTION;

        let total_bookings = self.store.count_matching(bookings, &Filter::all()).await?;
        let pending_bookings = self
            .store
            .count_matching(bookings, &Filter::all().eq("status", STATUS_PENDING))
            .await?;
        let total_visits = self
            .store
            .count_matching(
                events,
                &Filter::all().eq("event_type", analytics::EVENT_VISIT),
            )
            .await?;
        let total_leaves = self
            .store
            .count_matching(
                events,
                &Filter::all().eq("event_type", analytics::EVENT_LEAVE),
            )
            .await?;
        let total_queries = self
            .store
            .count_matching(SubjectQueryCreate::COLLECTION, &Filter::all())
            .await?;
        let total_contacts = self
            .store
            .count_matching(ContactMessageCreate::COLLECTION, &Filter::all())
            .await?;

        let recent_bookings = self
            .store
            .list_ordered(bookings, "created_at", true, RECENT_BOOKINGS)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect::<Result<Vec<DemoBooking>, _>>()?;

        Ok(AdminStats {
            total_bookings,
            pending_bookings,
            total_visits,
            total_leaves,
            total_queries,
            total_contacts,
            recent_bookings,
        })
    }
}
