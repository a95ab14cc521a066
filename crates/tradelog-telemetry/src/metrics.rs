//! Prometheus metrics for tradelog.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on duplicate
//! metric names, which is a programming error caught on first access at
//! startup, never mid-request.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec,
    TextEncoder,
};

/// Total insert attempts.
/// Labels: table, outcome (ok/error)
pub static INSERTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "tradelog_inserts_total",
        "Total single-row insert attempts",
        &["table", "outcome"]
    )
    .unwrap()
});

/// Insert round-trip latency in milliseconds.
pub static INSERT_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "tradelog_insert_latency_ms",
        "Store round-trip latency of a single-row insert in milliseconds",
        &["table"],
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0]
    )
    .unwrap()
});

/// Requests rejected before reaching the store.
/// Labels: entity, reason (body/empty/column)
pub static REJECTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "tradelog_rejected_requests_total",
        "Requests rejected by validation before reaching the store",
        &["entity", "reason"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a successful insert.
    pub fn insert_ok(table: &str, latency_ms: f64) {
        INSERTS_TOTAL.with_label_values(&[table, "ok"]).inc();
        INSERT_LATENCY_MS
            .with_label_values(&[table])
            .observe(latency_ms);
    }

    /// Record a failed insert.
    pub fn insert_failed(table: &str, latency_ms: f64) {
        INSERTS_TOTAL.with_label_values(&[table, "error"]).inc();
        INSERT_LATENCY_MS
            .with_label_values(&[table])
            .observe(latency_ms);
    }

    /// Record a request rejected by validation.
    pub fn request_rejected(entity: &str, reason: &str) {
        REJECTED_TOTAL.with_label_values(&[entity, reason]).inc();
    }

    /// Render all registered metrics in Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
