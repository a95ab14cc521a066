//! Endpoint handlers.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use tradelog_core::{Entity, Record, Row};
use tradelog_telemetry::Metrics;

use crate::error::ApiError;
use crate::server::AppState;

/// Insert the request body into the entity's table.
///
/// The destination comes from `entity` alone; nothing in the body can
/// change it.
pub(crate) async fn ingest(
    entity: Entity,
    state: AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Row>, ApiError> {
    match save(entity, &state, body).await {
        Ok(row) => Ok(Json(row)),
        Err(err @ ApiError::Store { .. }) => {
            error!(%entity, error = %err, "Insert failed");
            Err(err)
        }
        Err(err) => {
            warn!(%entity, reason = err.reason(), error = %err, "Rejected request");
            Metrics::request_rejected(entity.label(), err.reason());
            Err(err)
        }
    }
}

async fn save(
    entity: Entity,
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Row, ApiError> {
    let Json(body) = body?;
    let record = Record::from_value(body)?;
    record.validate()?;

    let table = entity.table();
    let started = Instant::now();
    let result = state.store().insert(table, record).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(row) => {
            Metrics::insert_ok(table.as_str(), elapsed_ms);
            debug!(%table, elapsed_ms, columns = row.len(), "Row inserted");
            Ok(row)
        }
        Err(e) => {
            if !e.is_record_error() {
                Metrics::insert_failed(table.as_str(), elapsed_ms);
            }
            Err(ApiError::store(entity, e))
        }
    }
}

/// Liveness probe.
pub(crate) async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "store": state.store().name(),
    }))
}

/// Prometheus text exposition.
pub(crate) async fn metrics() -> Response {
    match Metrics::render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
