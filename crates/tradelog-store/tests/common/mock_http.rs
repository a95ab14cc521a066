//! Mock HTTP database endpoints for integration tests.
//!
//! Serves just enough of the PostgREST and Neon HTTP APIs to exercise the
//! HTTP backends:
//! - `POST /rest/v1/{table}` echoes the body back with a generated `id`
//! - `POST /sql` answers with the query and params inside the row
//!
//! A body containing `"reject": true` (PostgREST) is answered with a 409, and
//! a Neon param holding the JSON string `"reject"` with a 400.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

/// A request seen by the mock server.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
    next_id: Arc<AtomicI64>,
}

/// A mock database HTTP server for testing.
pub struct MockHttpServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: oneshot::Sender<()>,
}

impl MockHttpServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = MockState::default();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route("/rest/v1/{table}", post(postgrest_insert))
            .route("/sql", post(neon_sql))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx,
        }
    }

    /// Base URL of the server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<ReceivedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Shutdown the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn postgrest_insert(
    State(state): State<MockState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().await.push(ReceivedRequest {
        path: format!("/rest/v1/{table}"),
        headers,
        body: body.clone(),
    });

    if body.get("reject") == Some(&Value::Bool(true)) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"code": "23505", "message": "duplicate key value"})),
        )
            .into_response();
    }

    let mut row = Map::new();
    row.insert(
        "id".to_string(),
        json!(state.next_id.fetch_add(1, Ordering::SeqCst) + 1),
    );
    if let Value::Object(columns) = body {
        row.extend(columns);
    }
    (StatusCode::CREATED, Json(Value::Object(row))).into_response()
}

async fn neon_sql(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().await.push(ReceivedRequest {
        path: "/sql".to_string(),
        headers: headers.clone(),
        body: body.clone(),
    });

    if headers.get("Neon-Connection-String").is_none() {
        return (StatusCode::UNAUTHORIZED, "missing connection string").into_response();
    }

    let params = body.get("params").cloned().unwrap_or(Value::Null);
    let rejected = params
        .as_array()
        .map(|p| {
            p.iter()
                .filter_map(Value::as_str)
                .any(|text| serde_json::from_str::<Value>(text).ok() == Some(json!("reject")))
        })
        .unwrap_or(false);
    if rejected {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "new row violates check constraint"})),
        )
            .into_response();
    }

    let row = json!({
        "id": state.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        "query": body.get("query").cloned().unwrap_or(Value::Null),
        "params": params,
    });
    Json(json!({
        "command": "INSERT",
        "rowCount": 1,
        "rows": [{"row": row.to_string()}],
    }))
    .into_response()
}
