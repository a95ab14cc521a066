//! Error types for tradelog-core.

use thiserror::Error;

/// Core error types.
///
/// Every variant describes a request that must be rejected before it reaches
/// a store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Record has no columns")]
    EmptyRecord,

    #[error("Invalid column name: {0:?}")]
    InvalidColumn(String),

    #[error("Record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
