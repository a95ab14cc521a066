//! Application wiring.

use std::future::Future;

use tracing::{info, warn};
use tradelog_store::DynRowStore;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Store plus API configuration, ready to serve.
pub struct Application {
    config: AppConfig,
    store: DynRowStore,
}

impl Application {
    /// Build the configured store backend.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = tradelog_store::connect(&config.store)?;
        Ok(Self::with_store(config, store))
    }

    /// Use an already constructed store.
    pub fn with_store(config: AppConfig, store: DynRowStore) -> Self {
        Self { config, store }
    }

    /// Serve until `shutdown` resolves, then close the store.
    ///
    /// The store is closed even when the server fails to start.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> AppResult<()> {
        info!(
            host = %self.config.api.host,
            port = self.config.api.port,
            store = self.store.name(),
            "Starting ingestion API"
        );

        let result =
            tradelog_api::run_server(self.store.clone(), self.config.api.clone(), shutdown).await;
        if let Err(e) = &result {
            warn!(error = %e, "API server exited with error");
        }

        self.store.close().await;
        info!("Shutdown complete");

        result.map_err(Into::into)
    }
}
