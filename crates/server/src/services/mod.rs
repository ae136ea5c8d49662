//! Application services: submission pipeline, analytics, notifications.

pub mod analytics;
pub mod leads;
pub mod notifier;

pub use analytics::{AdminStats, Analytics, TrackOutcome};
pub use leads::{LeadService, SubmitError};
pub use notifier::{DeepLinks, Notifier, NotifyError};
