//! tradelog-api - HTTP ingestion endpoints.
//!
//! Four structurally identical endpoints, each bound to one fixed table:
//!
//! ```text
//! POST /signal → signals
//! POST /order  → pending_orders
//! POST /trade  → trades
//! POST /event  → trade_events
//! ```
//!
//! The JSON body is forwarded unmodified as the record; the response is the
//! row as persisted. Store failures become a fixed per-entity 500 message,
//! malformed bodies a 400.
//!
//! Also served: `GET /health` and `GET /metrics` (Prometheus text format).
//!
//! # Usage
//!
//! ```ignore
//! use tradelog_api::{run_server, shutdown_signal, ApiConfig};
//!
//! let store = tradelog_store::connect(&store_config)?;
//! run_server(store.clone(), ApiConfig::default(), shutdown_signal()).await?;
//! store.close().await;
//! ```

mod config;
mod error;
mod handlers;
mod server;

pub use config::ApiConfig;
pub use error::ApiError;
pub use server::{create_router, run_server, shutdown_signal, AppState};
