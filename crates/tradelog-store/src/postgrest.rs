//! PostgREST backend (Supabase REST API).
//!
//! Inserts go to `POST {base_url}/rest/v1/{table}` with the record as the
//! JSON body. `Prefer: return=representation` asks for the inserted row back
//! and the `vnd.pgrst.object` accept type makes PostgREST answer with a
//! single object instead of a one-element array.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use tradelog_core::{InsertStatement, Record, Row, Table};

use crate::error::{StoreError, StoreResult};
use crate::store::{BoxFuture, RowStore};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Store that inserts through a PostgREST endpoint.
pub struct PostgrestStore {
    client: Client,
    base_url: String,
}

impl PostgrestStore {
    /// Create a new PostgREST store.
    ///
    /// # Arguments
    /// * `base_url` - project URL (e.g., "https://xyz.supabase.co")
    /// * `api_key` - service or anon key, sent as `apikey` and bearer token
    /// * `timeout` - per-request timeout
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// REST endpoint for `table`.
    pub fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    async fn insert_row(&self, table: Table, record: Record) -> StoreResult<Row> {
        InsertStatement::build(table, &record)?;

        let url = self.table_url(table);
        debug!(url = %url, columns = record.len(), "Posting row to PostgREST");

        let response = self.client.post(&url).json(&record).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("Failed to parse response: {e}")))?;

        into_row(body)
    }
}

/// Accept a single object, or the first element of an array response.
fn into_row(body: Value) -> StoreResult<Row> {
    match body {
        Value::Object(row) => Ok(row),
        Value::Array(rows) => match rows.into_iter().next() {
            Some(Value::Object(row)) => Ok(row),
            Some(other) => Err(StoreError::Decode(format!("Row is not an object: {other}"))),
            None => Err(StoreError::MissingRow),
        },
        other => Err(StoreError::Decode(format!("Unexpected response: {other}"))),
    }
}

fn header_value(value: &str) -> StoreResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| StoreError::Config("API key contains invalid header characters".to_string()))
}

impl RowStore for PostgrestStore {
    fn insert(&self, table: Table, record: Record) -> BoxFuture<'_, StoreResult<Row>> {
        Box::pin(self.insert_row(table, record))
    }

    fn name(&self) -> &'static str {
        "postgrest"
    }
}
