//! Lead-capture submissions: demo bookings, subject queries, and contact
//! messages.
//!
//! Each submission kind comes as a pair: a `*Create` payload (what the
//! website posts) and a canonical record (what the store persists and the
//! API returns). The [`LeadForm`] trait ties the pair together so the
//! submission pipeline can be written once.
//!
//! All records are flat. `id` and `created_at` are assigned server-side at
//! ingestion time and never change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::email::{Email, EmailError};

/// Initial status assigned to every new demo booking.
pub const STATUS_PENDING: &str = "pending";

/// Errors produced by submission validation.
///
/// Validation runs before any persistence attempt; a failing submission
/// leaves no trace in the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email address is structurally invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Check that a required field is present after trimming.
fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// A submission kind the pipeline can ingest.
///
/// Implementors validate their own required-field set and know how to turn
/// the inbound payload into a canonical record once the server has assigned
/// identity and timestamp.
pub trait LeadForm: DeserializeOwned + Send + 'static {
    /// Canonical record shape persisted for this kind.
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Store collection this kind persists into.
    const COLLECTION: &'static str;

    /// Human-readable kind name used in logs and notifications.
    const KIND: &'static str;

    /// Validate the required-field set for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a required field is missing or blank.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Build the canonical record from this payload.
    fn into_record(self, id: String, created_at: DateTime<Utc>) -> Self::Record;

    /// The record's assigned id.
    fn record_id(record: &Self::Record) -> &str;
}

// =============================================================================
// Demo bookings
// =============================================================================

/// Inbound payload for a free-demo booking.
///
/// Required fields also carry `#[serde(default)]`: an absent field
/// deserializes to an empty string and fails [`LeadForm::validate`], so
/// missing and present-but-blank report the same validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoBookingCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub subject_interest: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub message: String,
}

/// A persisted demo booking.
///
/// `status` is deliberately an open string (`pending`, `confirmed`,
/// `cancelled`, ...) so admin tooling can introduce new states without a
/// schema change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoBooking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade_level: String,
    pub subject_interest: String,
    pub preferred_date: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl LeadForm for DemoBookingCreate {
    type Record = DemoBooking;

    const COLLECTION: &'static str = "demo_bookings";
    const KIND: &'static str = "demo booking";

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        Email::parse(&self.email)?;
        Ok(())
    }

    fn into_record(self, id: String, created_at: DateTime<Utc>) -> DemoBooking {
        DemoBooking {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            grade_level: self.grade_level,
            subject_interest: self.subject_interest,
            preferred_date: self.preferred_date,
            message: self.message,
            status: STATUS_PENDING.to_owned(),
            created_at,
        }
    }

    fn record_id(record: &DemoBooking) -> &str {
        &record.id
    }
}

// =============================================================================
// Subject queries
// =============================================================================

/// Inbound payload for a subject-specific question.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectQueryCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_query_type")]
    pub query_type: String,
    #[serde(default)]
    pub message: String,
}

fn default_query_type() -> String {
    "general".to_owned()
}

/// A persisted subject query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectQuery {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub query_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl LeadForm for SubjectQueryCreate {
    type Record = SubjectQuery;

    const COLLECTION: &'static str = "subject_queries";
    const KIND: &'static str = "subject query";

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        Email::parse(&self.email)?;
        require("subject", &self.subject)?;
        Ok(())
    }

    fn into_record(self, id: String, created_at: DateTime<Utc>) -> SubjectQuery {
        SubjectQuery {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            query_type: self.query_type,
            message: self.message,
            created_at,
        }
    }

    fn record_id(record: &SubjectQuery) -> &str {
        &record.id
    }
}

// =============================================================================
// Contact messages
// =============================================================================

/// Inbound payload for a general contact-form message.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessageCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// A persisted contact message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl LeadForm for ContactMessageCreate {
    type Record = ContactMessage;

    const COLLECTION: &'static str = "contact_messages";
    const KIND: &'static str = "contact message";

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        Email::parse(&self.email)?;
        require("message", &self.message)?;
        Ok(())
    }

    fn into_record(self, id: String, created_at: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            created_at,
        }
    }

    fn record_id(record: &ContactMessage) -> &str {
        &record.id
    }
}
