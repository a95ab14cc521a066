//! Parameterized single-row INSERT construction.
//!
//! Identifiers (table and column names) are written into the statement text
//! double-quoted; values never are. Values travel separately as positional
//! parameters `$1..$N`, in the same order as the columns.
//!
//! Every parameter is bound as `jsonb`. The row is assembled with
//! `jsonb_populate_record`, which converts each value to the column type of
//! the target table, so JSON strings land in timestamp columns and JSON nulls
//! in integer columns without the caller knowing the schema. The INSERT is
//! wrapped in a CTE so the full persisted row, server-generated columns
//! included, comes back as a single JSON object named `row`:
//!
//! ```text
//! WITH inserted AS (
//!     INSERT INTO "trades" ("symbol", "qty") SELECT "symbol", "qty"
//!     FROM jsonb_populate_record(NULL::"trades",
//!         jsonb_build_object('symbol', $1::jsonb, 'qty', $2::jsonb))
//!     RETURNING *
//! ) SELECT to_jsonb(inserted) AS row FROM inserted
//! ```

use crate::error::Result;
use crate::record::Record;
use crate::table::Table;
use serde_json::Value;

/// Name of the single JSON column returned by [`InsertStatement::sql`].
pub const ROW_COLUMN: &str = "row";

const MAX_PAIRS_PER_OBJECT: usize = 50;

/// A validated single-row INSERT, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    table: Table,
    columns: Vec<String>,
    params: Vec<Value>,
}

impl InsertStatement {
    /// Build a statement inserting `record` into `table`.
    ///
    /// Fails if the record is empty or carries an invalid column name.
    pub fn build(table: Table, record: &Record) -> Result<Self> {
        record.validate()?;

        let (columns, params): (Vec<String>, Vec<Value>) = record
            .iter()
            .map(|(column, value)| (column.clone(), value.clone()))
            .unzip();

        Ok(Self {
            table,
            columns,
            params,
        })
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parameter values, index `i` binds to placeholder `$i+1`.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Statement text. `$i` takes `params()[i-1]` as `jsonb`, bound directly
    /// or sent as its JSON text.
    pub fn sql(&self) -> String {
        let table = quote_ident(self.table.as_str());
        let columns = self
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let pairs = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("'{}', ${}::jsonb", c.replace('\'', "''"), i + 1))
            .collect::<Vec<_>>();
        // jsonb_build_object takes at most 100 arguments
        let object = pairs
            .chunks(MAX_PAIRS_PER_OBJECT)
            .map(|chunk| format!("jsonb_build_object({})", chunk.join(", ")))
            .collect::<Vec<_>>()
            .join(" || ");

        returning_json(&format!(
            "INSERT INTO {table} ({columns}) SELECT {columns} \
             FROM jsonb_populate_record(NULL::{table}, {object}) RETURNING *"
        ))
    }
}

fn returning_json(insert: &str) -> String {
    format!("WITH inserted AS ({insert}) SELECT to_jsonb(inserted) AS {ROW_COLUMN} FROM inserted")
}

/// Double-quote an identifier that already passed validation.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
