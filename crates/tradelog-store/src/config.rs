//! Store configuration and backend selection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::neon::NeonHttpStore;
use crate::postgres::PgStore;
use crate::postgrest::PostgrestStore;
use crate::store::DynRowStore;

/// Which transport reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Pooled Postgres connection (`DATABASE_URL`).
    #[default]
    Postgres,
    /// Supabase / PostgREST (`SUPABASE_URL`, `SUPABASE_KEY`).
    Postgrest,
    /// Neon serverless SQL over HTTP (`DATABASE_URL`).
    Neon,
}

/// Store configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Postgres connection string (postgres and neon backends).
    #[serde(default)]
    pub database_url: Option<String>,
    /// PostgREST project URL.
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// PostgREST API key.
    #[serde(default)]
    pub supabase_key: Option<String>,
    /// Maximum pooled connections (postgres backend).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Time to wait for a pooled connection (ms).
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    /// Per-request timeout for HTTP backends (ms).
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            supabase_url: None,
            supabase_key: None,
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

// Connection strings and keys carry credentials; keep them out of logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .field("http_timeout_ms", &self.http_timeout_ms)
            .finish()
    }
}

impl StoreConfig {
    /// Check that the selected backend has everything it needs.
    pub fn validate(&self) -> StoreResult<()> {
        match self.backend {
            StoreBackend::Postgres | StoreBackend::Neon => {
                required(&self.database_url, "DATABASE_URL")?;
            }
            StoreBackend::Postgrest => {
                required(&self.supabase_url, "SUPABASE_URL")?;
                required(&self.supabase_key, "SUPABASE_KEY")?;
            }
        }
        if self.max_connections == 0 {
            return Err(StoreError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> StoreResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(StoreError::Config(format!("{name} is not set"))),
    }
}

/// Build the configured backend.
///
/// Validates the configuration first, so a missing connection string fails
/// here at startup and never on a request. Must be called from within a
/// tokio runtime.
pub fn connect(config: &StoreConfig) -> StoreResult<DynRowStore> {
    config.validate()?;

    let store: DynRowStore = match config.backend {
        StoreBackend::Postgres => Arc::new(PgStore::connect_lazy(
            required(&config.database_url, "DATABASE_URL")?,
            config.max_connections,
            config.acquire_timeout(),
        )?),
        StoreBackend::Postgrest => Arc::new(PostgrestStore::new(
            required(&config.supabase_url, "SUPABASE_URL")?,
            required(&config.supabase_key, "SUPABASE_KEY")?,
            config.http_timeout(),
        )?),
        StoreBackend::Neon => Arc::new(NeonHttpStore::new(
            required(&config.database_url, "DATABASE_URL")?,
            config.http_timeout(),
        )?),
    };

    info!(backend = store.name(), "Store ready");
    Ok(store)
}
