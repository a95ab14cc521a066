//! Store trait for single-row inserts.
//!
//! Provides a trait-based abstraction over the transport that reaches the
//! database, so handlers depend on one interface regardless of whether rows
//! travel over a pooled Postgres connection or an HTTP API.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tradelog_core::{InsertStatement, Record, Row, Table};

use crate::error::{StoreError, StoreResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Single-row insert into one of the fixed tables.
pub trait RowStore: Send + Sync {
    /// Insert `record` into `table` and return the row as persisted.
    ///
    /// The insert is atomic: on error no row is written. Nothing is retried.
    fn insert(&self, table: Table, record: Record) -> BoxFuture<'_, StoreResult<Row>>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Release pooled resources. Called once on shutdown.
    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}

/// Arc wrapper for RowStore trait objects.
pub type DynRowStore = Arc<dyn RowStore>;

/// In-memory store for testing.
///
/// Mimics a table with a `bigserial` primary key: every persisted row gets a
/// fresh `id` on top of the caller's columns.
#[derive(Debug, Default)]
pub struct MockRowStore {
    rows: Mutex<HashMap<Table, Vec<Row>>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl MockRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Rows persisted to `table`, in insert order.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.rows.lock().get(&table).cloned().unwrap_or_default()
    }

    /// Total rows across all tables.
    pub fn row_count(&self) -> usize {
        self.rows.lock().values().map(Vec::len).sum()
    }
}

impl RowStore for MockRowStore {
    fn insert(&self, table: Table, record: Record) -> BoxFuture<'_, StoreResult<Row>> {
        Box::pin(async move {
            InsertStatement::build(table, &record)?;

            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock store offline".into()));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let mut row = Row::new();
            row.insert("id".to_string(), Value::from(id));
            row.extend(record.into_inner());

            self.rows.lock().entry(table).or_default().push(row.clone());
            Ok(row)
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tradelog_core::CoreError;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_mock_store_returns_row_with_generated_id() {
        let store = MockRowStore::new();
        let row = store
            .insert(Table::Trades, record(json!({"symbol": "BTCUSD", "qty": 1.5})))
            .await
            .unwrap();

        assert_eq!(row.get("id"), Some(&json!(1)));
        assert_eq!(row.get("symbol"), Some(&json!("BTCUSD")));
        assert_eq!(row.get("qty"), Some(&json!(1.5)));
        assert_eq!(store.rows(Table::Trades), vec![row]);
        assert!(store.rows(Table::Signals).is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_rejects_invalid_record_without_writing() {
        let store = MockRowStore::new();
        let err = store.insert(Table::Signals, Record::new()).await.unwrap_err();

        assert!(matches!(err, StoreError::Record(CoreError::EmptyRecord)));
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_store_unavailable_then_recovers() {
        let store = MockRowStore::new();
        store.set_unavailable(true);

        let err = store
            .insert(Table::TradeEvents, record(json!({"kind": "fill"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.row_count(), 0);

        store.set_unavailable(false);
        store
            .insert(Table::TradeEvents, record(json!({"kind": "fill"})))
            .await
            .unwrap();
        assert_eq!(store.rows(Table::TradeEvents).len(), 1);
    }

    #[test]
    fn test_mock_store_through_trait_object() {
        let store: DynRowStore = Arc::new(MockRowStore::new());
        assert_eq!(store.name(), "mock");

        let row = tokio_test::block_on(
            store.insert(Table::PendingOrders, record(json!({"side": "sell"}))),
        )
        .unwrap();
        assert_eq!(row.get("side"), Some(&json!("sell")));
        tokio_test::block_on(store.close());
    }
}
