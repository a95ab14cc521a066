//! Caller-supplied records and persisted rows.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum identifier length accepted by Postgres (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// A row as persisted by the store, including server-generated columns.
pub type Row = Map<String, Value>;

/// Column name → value mapping for one row to insert.
///
/// Key order is the order in which keys were inserted (or appeared in the
/// JSON body), and it is the column order of the generated statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// Only objects are records; anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(CoreError::NotAnObject("null")),
            Value::Bool(_) => Err(CoreError::NotAnObject("boolean")),
            Value::Number(_) => Err(CoreError::NotAnObject("number")),
            Value::String(_) => Err(CoreError::NotAnObject("string")),
            Value::Array(_) => Err(CoreError::NotAnObject("array")),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in statement order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check that the record can be turned into an INSERT.
    ///
    /// A record must carry at least one column and every column name must
    /// be a plain identifier.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(CoreError::EmptyRecord);
        }
        self.0.keys().try_for_each(|column| validate_column(column))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validate a column name.
///
/// Accepted names match `[A-Za-z_][A-Za-z0-9_]*` and fit in a Postgres
/// identifier. Column names come from request bodies, so this is the only
/// thing standing between caller input and the statement text.
pub fn validate_column(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(())
    } else {
        Err(CoreError::InvalidColumn(name.to_string()))
    }
}
