//! Prometheus metrics and structured logging for tradelog.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Insert outcome and latency metrics per table
//! - Text exposition for the `/metrics` endpoint

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_logging_with, LogFormat};
pub use metrics::Metrics;
