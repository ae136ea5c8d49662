//! Supabase REST table backend.
//!
//! Talks to PostgREST (`/rest/v1/<table>`) over HTTP. Mutations are filtered
//! by `id` (`?id=eq.<id>`), representation is requested via `Prefer` headers
//! so matched/deleted can be reported, and counts come back in the
//! `content-range` header. Every transport failure or non-2xx response wraps
//! into [`StoreError`].

use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::SupabaseConfig;

use super::{Filter, Store, StoreError, record_id};

/// Store backend over Supabase REST tables.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
}

impl SupabaseStore {
    /// Create a new Supabase store client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let key = config.service_key.expose_secret();
        let api_key = HeaderValue::from_str(key)
            .map_err(|e| StoreError::InvalidRecord(format!("invalid service key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::InvalidRecord(format!("invalid service key: {e}")))?;

        headers.insert("apikey", api_key);
        headers.insert("Authorization", bearer);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_owned(),
        })
    }

    fn table_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{collection}", self.base_url)
    }
}

/// Render a filter value the way PostgREST expects it in `field=eq.<value>`.
fn filter_operand(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a non-success response into a `StoreError`, consuming the body for
/// the error message.
async fn error_for(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();

    if status == StatusCode::CONFLICT {
        StoreError::Conflict(message)
    } else {
        StoreError::Backend {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn insert(&self, collection: &str, record: Value) -> Result<(), StoreError> {
        record_id(&record)?;

        let response = self
            .client
            .post(self.table_url(collection))
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        descending: bool,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let direction = if descending { "desc" } else { "asc" };

        let response = self
            .client
            .get(self.table_url(collection))
            .query(&[
                ("select", "*".to_owned()),
                ("order", format!("{sort_field}.{direction}")),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        Ok(response.json().await?)
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<bool, StoreError> {
        let body = serde_json::json!({ field: value });

        let response = self
            .client
            .patch(self.table_url(collection))
            .query(&[("id", &format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let updated: Vec<Value> = response.json().await?;
        Ok(!updated.is_empty())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .delete(self.table_url(collection))
            .query(&[("id", &format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let deleted: Vec<Value> = response.json().await?;
        Ok(!deleted.is_empty())
    }

    async fn count_matching(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut query: Vec<(String, String)> = vec![("select".to_owned(), "id".to_owned())];
        for (field, value) in filter.iter() {
            query.push((field.to_owned(), format!("eq.{}", filter_operand(value))));
        }

        // Request an exact count with a zero-row window; the total arrives
        // in the content-range header as `0-0/<count>` or `*/<count>`.
        let response = self
            .client
            .get(self.table_url(collection))
            .query(&query)
            .header("Prefer", "count=exact")
            .header("Range-Unit", "items")
            .header("Range", "0-0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Backend {
                status: 200,
                message: "missing content-range header in count response".to_owned(),
            })?;

        content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<u64>().ok())
            .ok_or_else(|| StoreError::Backend {
                status: 200,
                message: format!("unparseable content-range: {content_range}"),
            })
    }
}
