//! Submission pipeline for lead-capture forms.
//!
//! One [`LeadService`] instance per submission kind; the logic is identical
//! modulo record shape, so it is written once over [`LeadForm`]. The
//! pipeline is: validate, assign identity and timestamp, persist, schedule
//! the staff notification, return the canonical record.
//!
//! Persistence success is a precondition for notification: a failed insert
//! surfaces to the caller and the notifier is never invoked. The notifier
//! itself is detached and can never fail the request.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use tutorlane_core::{LeadForm, ValidationError};

use crate::store::{Store, StoreError};

use super::notifier::{LeadNotification, Notifier};

/// Cap on listing results, newest first.
pub const LIST_CAP: usize = 1000;

/// Errors produced by the submission pipeline.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The payload failed validation; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected the write; no notification was scheduled.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stateless, request-scoped orchestrator for one submission kind.
pub struct LeadService<F: LeadForm> {
    store: Arc<dyn Store>,
    notifier: Notifier,
    _form: PhantomData<F>,
}

impl<F> LeadService<F>
where
    F: LeadForm,
    F::Record: LeadNotification,
{
    /// Create a service over the given store and notifier.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, notifier: Notifier) -> Self {
        Self {
            store,
            notifier,
            _form: PhantomData,
        }
    }

    /// Ingest a submission.
    ///
    /// Validates, assigns a fresh UUID and a server-side UTC timestamp,
    /// persists, then schedules the staff notification as a detached task.
    /// The returned record always carries the server-assigned fields.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] before any persistence attempt,
    /// or [`SubmitError::Store`] if the insert fails (in which case no
    /// notification is scheduled).
    pub async fn submit(&self, input: F) -> Result<F::Record, SubmitError> {
        input.validate()?;

        let id = Uuid::new_v4().to_string();
        let record = input.into_record(id, Utc::now());

        let document = serde_json::to_value(&record).map_err(StoreError::from)?;
        self.store.insert(F::COLLECTION, document).await?;

        tracing::info!(
            kind = F::KIND,
            id = F::record_id(&record),
            "lead captured"
        );
        self.notifier.dispatch(F::KIND, &record);

        Ok(record)
    }

    /// List persisted records, newest first, capped at [`LIST_CAP`].
    ///
    /// # Errors
    ///
    /// Store failures surface to the caller rather than masking an outage
    /// with an empty list.
    pub async fn list(&self) -> Result<Vec<F::Record>, StoreError> {
        let documents = self
            .store
            .list_ordered(F::COLLECTION, "created_at", true, LIST_CAP)
            .await?;

        documents
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// Set the status of a record. Any non-empty string is accepted.
    ///
    /// Returns whether a record with that id existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    pub async fn update_status(&self, id: &str, status: &str) -> Result<bool, StoreError> {
        self.store
            .update_field(F::COLLECTION, id, "status", status.into())
            .await
    }

    /// Delete a record by id. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend call fails.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_by_id(F::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorlane_core::{DemoBookingCreate, leads::STATUS_PENDING};

    use crate::store::{Filter, MemoryStore};

    fn service() -> (Arc<MemoryStore>, LeadService<DemoBookingCreate>) {
        let store = Arc::new(MemoryStore::new());
        let service = LeadService::new(store.clone(), Notifier::disabled());
        (store, service)
    }

    fn booking(name: &str) -> DemoBookingCreate {
        DemoBookingCreate {
            name: name.to_owned(),
            email: "parent@example.com".to_owned(),
            phone: String::new(),
            grade_level: "Grade 8".to_owned(),
            subject_interest: "Mathematics".to_owned(),
            preferred_date: String::new(),
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_assigns_id_status_and_timestamp() {
        let (_, service) = service();

        let before = Utc::now();
        let record = service.submit(booking("Asha Rao")).await.expect("submit");
        let after = Utc::now();

        assert!(!record.id.is_empty());
        assert_eq!(record.status, STATUS_PENDING);
        assert!(record.created_at >= before && record.created_at <= after);
    }

    #[tokio::test]
    async fn test_submit_ids_are_fresh() {
        let (_, service) = service();
        let a = service.submit(booking("A")).await.expect("submit");
        let b = service.submit(booking("B")).await.expect("submit");
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_invalid_submission_writes_nothing() {
        let (store, service) = service();

        let mut input = booking("Asha Rao");
        input.email = String::new();
        let err = service.submit(input).await.expect_err("invalid");
        assert!(matches!(err, SubmitError::Validation(_)));

        let count = store
            .count_matching("demo_bookings", &Filter::all())
            .await
            .expect("count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (_, service) = service();
        for name in ["first", "second", "third"] {
            service.submit(booking(name)).await.expect("submit");
        }

        let records = service.list().await.expect("list");
        assert_eq!(records.len(), 3);
        for pair in records.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_update_status_only_touches_status() {
        let (_, service) = service();
        let record = service.submit(booking("Asha Rao")).await.expect("submit");

        let matched = service
            .update_status(&record.id, "confirmed")
            .await
            .expect("update");
        assert!(matched);

        let records = service.list().await.expect("list");
        assert_eq!(records[0].status, "confirmed");
        assert_eq!(records[0].name, record.name);
        assert_eq!(records[0].created_at, record.created_at);

        let matched = service
            .update_status("no-such-id", "confirmed")
            .await
            .expect("update");
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let (_, service) = service();
        let record = service.submit(booking("Asha Rao")).await.expect("submit");

        assert!(service.delete(&record.id).await.expect("delete"));
        assert!(!service.delete(&record.id).await.expect("delete"));
        assert!(service.list().await.expect("list").is_empty());
    }
}
