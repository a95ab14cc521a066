//! Row store backends for tradelog.
//!
//! One operation, many transports: every backend implements [`RowStore`],
//! which inserts a single [`Record`](tradelog_core::Record) into a fixed
//! [`Table`](tradelog_core::Table) and returns the persisted row.
//!
//! - [`PgStore`]: pooled Postgres connection via sqlx
//! - [`PostgrestStore`]: Supabase / PostgREST over HTTPS
//! - [`NeonHttpStore`]: Neon serverless SQL-over-HTTP
//! - [`MockRowStore`]: in-memory store for tests
//!
//! The backend is chosen by [`StoreConfig`] and built with [`connect`].

pub mod config;
pub mod error;
pub mod neon;
pub mod postgres;
pub mod postgrest;
pub mod store;

pub use config::{connect, StoreBackend, StoreConfig};
pub use error::{BoxError, StoreError, StoreResult};
pub use neon::NeonHttpStore;
pub use postgres::PgStore;
pub use postgrest::PostgrestStore;
pub use store::{BoxFuture, DynRowStore, MockRowStore, RowStore};
