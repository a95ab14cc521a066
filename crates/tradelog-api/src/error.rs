//! API error types and their HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tradelog_core::{CoreError, Entity};
use tradelog_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be read as JSON.
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    /// Body is JSON but not an insertable record.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] CoreError),

    /// The store failed the insert. The cause is logged, never returned.
    #[error("Failed to save {entity}: {source}")]
    Store {
        entity: Entity,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(entity: Entity, source: StoreError) -> Self {
        match source {
            StoreError::Record(e) => ApiError::InvalidRecord(e),
            source => ApiError::Store { entity, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label for validation failures.
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::InvalidBody { .. } => "body",
            ApiError::InvalidRecord(CoreError::EmptyRecord) => "empty",
            ApiError::InvalidRecord(CoreError::InvalidColumn(_)) => "column",
            ApiError::InvalidRecord(CoreError::NotAnObject(_)) => "not_object",
            ApiError::Store { .. } => "store",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Everything except an oversized body is reported as a plain 400.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::InvalidBody {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store { entity, .. } => entity.failure_message().to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
