//! Pooled Postgres backend using sqlx.
//!
//! Every record value is bound as `jsonb` and converted to its column type
//! by the server (see [`InsertStatement::sql`]), so the store
//! stays schema-agnostic while values never enter the statement text.
//!
//! The pool is connected lazily: a malformed URL fails at construction, an
//! unreachable server only fails the requests that need it, and the pool
//! recovers on its own once the server is back. Connections go back to the
//! pool when the query future completes or is dropped.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};
use tradelog_core::{InsertStatement, Record, Row, Table};

use crate::error::{StoreError, StoreResult};
use crate::store::{BoxFuture, RowStore};

/// Postgres store backed by a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build a lazily-connected pool for `database_url`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Config(format!("Invalid DATABASE_URL: {e}")))?;

        info!(
            host = %options.get_host(),
            database = options.get_database().unwrap_or("<default>"),
            max_connections,
            "Creating Postgres pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_row(&self, table: Table, record: Record) -> StoreResult<Row> {
        let statement = InsertStatement::build(table, &record)?;
        let sql = statement.sql();

        debug!(%table, columns = statement.columns().len(), "Executing insert");

        let mut query = sqlx::query_scalar::<_, Json<Row>>(&sql);
        for value in statement.into_params() {
            query = query.bind(Json(value));
        }

        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::MissingRow)?;

        Ok(row.0)
    }
}

impl RowStore for PgStore {
    fn insert(&self, table: Table, record: Record) -> BoxFuture<'_, StoreResult<Row>> {
        Box::pin(self.insert_row(table, record))
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            info!(
                idle = self.pool.num_idle(),
                size = self.pool.size(),
                "Closing Postgres pool"
            );
            self.pool.close().await;
        })
    }
}
