//! Search result rows and typed column access.

use crate::domain::TaskId;
use crate::error::{FtsError, FtsResult};
use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// One matching entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub task_id: TaskId,

    /// Ratio of query ngrams found in the entity, in `(0.3, 1.0]`
    pub score: f64,

    /// One of the ngrams that matched
    pub matched_ngram: String,

    /// Every column of the entity view, by column name
    pub values: BTreeMap<String, Value>,
}

impl SearchHit {
    /// Raw value of a view column.
    ///
    /// # Errors
    ///
    /// `FtsError::MissingColumn` if the view has no such column.
    pub fn get(&self, column: &str) -> FtsResult<&Value> {
        self.values
            .get(column)
            .ok_or_else(|| FtsError::MissingColumn(column.to_string()))
    }

    /// Integer column, `None` when NULL.
    pub fn get_i64(&self, column: &str) -> FtsResult<Option<i64>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| type_error(column, "integer")),
            _ => Err(type_error(column, "integer")),
        }
    }

    /// Text column, `None` when NULL.
    pub fn get_str(&self, column: &str) -> FtsResult<Option<&str>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.as_str())),
            _ => Err(type_error(column, "text")),
        }
    }

    /// Integer column read as a flag (non-zero is true), `None` when NULL.
    pub fn get_bool(&self, column: &str) -> FtsResult<Option<bool>> {
        self.get_i64(column)
            .map_err(|e| match e {
                FtsError::InvalidColumnType { column, .. } => FtsError::InvalidColumnType {
                    column,
                    expected: "flag",
                },
                other => other,
            })
            .map(|v| v.map(|n| n != 0))
    }
}

fn type_error(column: &str, expected: &'static str) -> FtsError {
    FtsError::InvalidColumnType {
        column: column.to_string(),
        expected,
    }
}

/// Convert an SQLite value into JSON.
///
/// Blobs become arrays of bytes; non-finite reals become `null`.
pub(crate) fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}
