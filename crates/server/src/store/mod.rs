//! Persistence abstraction over named record collections.
//!
//! The [`Store`] trait is the only persistence surface the rest of the
//! server sees. Records are flat JSON objects with a string `id` field;
//! collections are named (`demo_bookings`, `subject_queries`,
//! `contact_messages`, `visitor_events`).
//!
//! Two backends implement the trait with an identical contract:
//!
//! - [`MemoryStore`] - schemaless in-process document store (development
//!   and tests); ids are client-generated and checked for collisions.
//! - [`SupabaseStore`] - Supabase REST tables (PostgREST); mutations are
//!   filtered by `id`, uniqueness is enforced server-side.
//!
//! Callers never branch on backend identity and never observe
//! backend-specific error types: everything wraps into [`StoreError`].

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// Errors produced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same id already exists.
    #[error("record with this id already exists: {0}")]
    Conflict(String),

    /// The record is not a flat JSON object with a string `id`.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The backend rejected the request.
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The HTTP transport to the backend failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A record failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A conjunction of equality predicates over record fields.
///
/// An empty filter matches every record in the collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<(String, Value)>,
}

impl Filter {
    /// A filter that matches every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((field.into(), value.into()));
        self
    }

    /// Iterate over the predicates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether a JSON object satisfies every predicate.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        self.predicates
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

/// Capability set over named record collections.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new record. Must not silently overwrite an existing id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a record with the same id already
    /// exists, [`StoreError::InvalidRecord`] if the record is not an object
    /// with a string `id`, or a backend error.
    async fn insert(&self, collection: &str, record: Value) -> Result<(), StoreError>;

    /// Return up to `limit` records ordered by `sort_field`.
    ///
    /// An empty collection yields an empty sequence, never an error.
    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        descending: bool,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;

    /// Set a single field on the record with the given id.
    ///
    /// Returns whether a record with that id existed; no-op if absent.
    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<bool, StoreError>;

    /// Remove the record with the given id.
    ///
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Count records matching the filter. An empty filter counts the whole
    /// collection.
    async fn count_matching(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}

/// Extract the string `id` from a record, or explain why it is invalid.
pub(crate) fn record_id(record: &Value) -> Result<&str, StoreError> {
    let object = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidRecord("record is not a JSON object".to_owned()))?;
    object
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidRecord("record has no string `id` field".to_owned()))
}
