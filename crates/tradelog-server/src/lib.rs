//! tradelog ingestion server.
//!
//! Wires configuration, the selected store backend and the HTTP API:
//! - Configuration from TOML file + environment (fails fast when incomplete)
//! - Store connection built once at startup
//! - API served until shutdown, then the store is drained

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
