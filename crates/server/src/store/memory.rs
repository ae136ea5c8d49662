//! In-process document store.
//!
//! Schemaless collections of JSON objects held in a concurrent map. Ids are
//! client-generated and checked for collisions on insert. Queries cannot
//! fail transiently, which makes this the backend of choice for development
//! and tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use dashmap::DashMap;
use serde_json::Value;

use super::{Filter, Store, StoreError, record_id};

/// Schemaless in-memory document store keyed by collection name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Order two field values for sorting.
///
/// RFC 3339 strings compare as timestamps (fractional-second precision
/// varies between values, so lexicographic order is not chronological);
/// other strings compare lexicographically, numbers numerically.
fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, collection: &str, record: Value) -> Result<(), StoreError> {
        let id = record_id(&record)?.to_owned();
        let mut records = self.collections.entry(collection.to_owned()).or_default();

        let exists = records
            .iter()
            .any(|existing| existing.get("id").and_then(Value::as_str) == Some(id.as_str()));
        if exists {
            return Err(StoreError::Conflict(id));
        }

        records.push(record);
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        descending: bool,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let Some(records) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut records = records.value().clone();
        records.sort_by(|a, b| {
            let fa = a.get(sort_field).unwrap_or(&Value::Null);
            let fb = b.get(sort_field).unwrap_or(&Value::Null);
            let ordering = compare_fields(fa, fb);
            if descending { ordering.reverse() } else { ordering }
        });
        records.truncate(limit);
        Ok(records)
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<bool, StoreError> {
        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(false);
        };

        for record in records.iter_mut() {
            if record.get("id").and_then(Value::as_str) == Some(id) {
                if let Some(object) = record.as_object_mut() {
                    object.insert(field.to_owned(), value);
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = records.len();
        records.retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        Ok(records.len() < before)
    }

    async fn count_matching(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let Some(records) = self.collections.get(collection) else {
            return Ok(0);
        };

        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, created_at: &str) -> Value {
        json!({"id": id, "status": "pending", "created_at": created_at})
    }

    #[tokio::test]
    async fn test_insert_then_count() {
        let store = MemoryStore::new();
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");
        assert_eq!(
            store
                .count_matching("demo_bookings", &Filter::all())
                .await
                .expect("count"),
            1
        );
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");
        let err = store
            .insert("demo_bookings", record("a", "2026-08-02T10:00:00Z"))
            .await
            .expect_err("duplicate id");
        assert!(matches!(err, StoreError::Conflict(id) if id == "a"));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let store = MemoryStore::new();
        let err = store
            .insert("demo_bookings", json!("just a string"))
            .await
            .expect_err("invalid record");
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[tokio::test]
    async fn test_list_ordered_newest_first() {
        let store = MemoryStore::new();
        // Insert out of chronological order, with mixed fractional precision
        store
            .insert("demo_bookings", record("b", "2026-08-02T10:00:00Z"))
            .await
            .expect("insert");
        store
            .insert("demo_bookings", record("c", "2026-08-02T10:00:00.500Z"))
            .await
            .expect("insert");
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");

        let records = store
            .list_ordered("demo_bookings", "created_at", true, 1000)
            .await
            .expect("list");
        let ids: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str))
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert(
                    "visitor_events",
                    json!({"id": format!("ev-{i}"), "timestamp": format!("2026-08-0{}T00:00:00Z", i + 1)}),
                )
                .await
                .expect("insert");
        }
        let records = store
            .list_ordered("visitor_events", "timestamp", true, 2)
            .await
            .expect("list");
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_collection_is_empty_not_error() {
        let store = MemoryStore::new();
        let records = store
            .list_ordered("demo_bookings", "created_at", true, 1000)
            .await
            .expect("list");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_update_field_reports_match() {
        let store = MemoryStore::new();
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");

        let matched = store
            .update_field("demo_bookings", "a", "status", json!("confirmed"))
            .await
            .expect("update");
        assert!(matched);

        let records = store
            .list_ordered("demo_bookings", "created_at", true, 1000)
            .await
            .expect("list");
        assert_eq!(records[0]["status"], "confirmed");

        let matched = store
            .update_field("demo_bookings", "missing", "status", json!("confirmed"))
            .await
            .expect("update");
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_removal() {
        let store = MemoryStore::new();
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");

        assert!(store.delete_by_id("demo_bookings", "a").await.expect("delete"));
        assert!(!store.delete_by_id("demo_bookings", "a").await.expect("delete"));
        assert_eq!(
            store
                .count_matching("demo_bookings", &Filter::all())
                .await
                .expect("count"),
            0
        );
    }

    #[tokio::test]
    async fn test_count_matching_with_filter() {
        let store = MemoryStore::new();
        store
            .insert("demo_bookings", record("a", "2026-08-01T10:00:00Z"))
            .await
            .expect("insert");
        store
            .insert(
                "demo_bookings",
                json!({"id": "b", "status": "confirmed", "created_at": "2026-08-02T10:00:00Z"}),
            )
            .await
            .expect("insert");

        let pending = store
            .count_matching("demo_bookings", &Filter::all().eq("status", "pending"))
            .await
            .expect("count");
        assert_eq!(pending, 1);

        let missing = store
            .count_matching("visitor_events", &Filter::all())
            .await
            .expect("count");
        assert_eq!(missing, 0);
    }
}
