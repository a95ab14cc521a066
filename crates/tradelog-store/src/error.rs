//! Store error types.

use thiserror::Error;
use tradelog_core::CoreError;

/// Type-erased cause of an unreachable store.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid record: {0}")]
    Record(#[from] CoreError),

    #[error("Store unavailable: {0}")]
    Unavailable(#[source] BoxError),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Store rejected insert (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Insert returned no row")]
    MissingRow,

    #[error("Failed to decode row: {0}")]
    Decode(String),

    #[error("Store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether the failure was caused by the record rather than the store.
    pub fn is_record_error(&self) -> bool {
        matches!(self, StoreError::Record(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(Box::new(e))
            }
            sqlx::Error::Configuration(_) => StoreError::Config(e.to_string()),
            other => StoreError::Database(other),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            StoreError::Unavailable(Box::new(e))
        } else {
            StoreError::Http(e)
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_sqlx_pool_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }

    #[test]
    fn test_driver_error_is_kept_as_source() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        let source = err.source().expect("unavailable carries its cause");
        assert!(matches!(
            source.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::PoolTimedOut)
        ));

        let err = StoreError::from(sqlx::Error::RowNotFound);
        let source = err.source().expect("database error carries its cause");
        assert!(matches!(
            source.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_record_error_classification() {
        assert!(StoreError::from(CoreError::EmptyRecord).is_record_error());
        assert!(!StoreError::MissingRow.is_record_error());
    }
}
