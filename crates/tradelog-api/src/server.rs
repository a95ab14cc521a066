//! HTTP server implementation using axum.

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::info;
use tradelog_core::Entity;
use tradelog_store::DynRowStore;

use crate::config::ApiConfig;
use crate::handlers;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    store: DynRowStore,
}

impl AppState {
    pub fn new(store: DynRowStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynRowStore {
        &self.store
    }
}

/// Create the axum router.
///
/// One POST route per entity, each bound to its own table.
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics));

    for entity in Entity::ALL {
        router = router.route(
            entity.path(),
            post(
                move |State(state): State<AppState>,
                      body: Result<Json<Value>, JsonRejection>| {
                    handlers::ingest(entity, state, body)
                },
            ),
        );
    }

    router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the API server until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns. The store
/// is not closed here; the caller owns it.
pub async fn run_server(
    store: DynRowStore,
    config: ApiConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = create_router(AppState::new(store), &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("API server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
