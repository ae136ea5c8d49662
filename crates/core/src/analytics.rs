//! Visitor lifecycle events.
//!
//! The landing page reports `visit` and `leave` events keyed by a
//! client-chosen session id. Ingestion is append-only: no dedup, no
//! mutation, and `event_type` is not validated against a fixed set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store collection for visitor events.
pub const COLLECTION: &str = "visitor_events";

/// Event type recorded when a visitor lands on a page.
pub const EVENT_VISIT: &str = "visit";

/// Event type recorded when a visitor leaves.
pub const EVENT_LEAVE: &str = "leave";

/// Inbound payload for a visitor event.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorEventCreate {
    /// Client-chosen correlation key; not unique across events.
    pub session_id: String,
    pub event_type: String,
    #[serde(default = "default_page")]
    pub page: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referrer: String,
}

fn default_page() -> String {
    "/".to_owned()
}

/// A persisted visitor event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorEvent {
    pub id: String,
    pub session_id: String,
    pub event_type: String,
    pub page: String,
    pub user_agent: String,
    pub referrer: String,
    pub timestamp: DateTime<Utc>,
}

impl VisitorEventCreate {
    /// Build the canonical event from this payload.
    #[must_use]
    pub fn into_event(self, id: String, timestamp: DateTime<Utc>) -> VisitorEvent {
        VisitorEvent {
            id,
            session_id: self.session_id,
            event_type: self.event_type,
            page: self.page,
            user_agent: self.user_agent,
            referrer: self.referrer,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_root() {
        let input: VisitorEventCreate = serde_json::from_value(serde_json::json!({
            "session_id": "s-1",
            "event_type": "visit"
        }))
        .expect("valid payload");
        assert_eq!(input.page, "/");
        assert_eq!(input.user_agent, "");
        assert_eq!(input.referrer, "");
    }

    #[test]
    fn test_into_event_carries_fields() {
        let now = Utc::now();
        let event = VisitorEventCreate {
            session_id: "s-1".to_owned(),
            event_type: EVENT_LEAVE.to_owned(),
            page: "/pricing".to_owned(),
            user_agent: "Mozilla/5.0".to_owned(),
            referrer: "https://google.com".to_owned(),
        }
        .into_event("ev-1".to_owned(), now);

        assert_eq!(event.id, "ev-1");
        assert_eq!(event.event_type, EVENT_LEAVE);
        assert_eq!(event.timestamp, now);
    }
}
