//! Core types for the tradelog ingestion service.
//!
//! This crate provides the pieces every store backend shares:
//! - `Record`: caller-supplied column → value mapping for one row
//! - `Table` / `Entity`: the fixed allow-list of destination tables
//! - `InsertStatement`: parameterized single-row INSERT built from a record

pub mod error;
pub mod record;
pub mod statement;
pub mod table;

pub use error::{CoreError, Result};
pub use record::{validate_column, Record, Row, MAX_IDENTIFIER_LEN};
pub use statement::{InsertStatement, ROW_COLUMN};
pub use table::{Entity, Table};
