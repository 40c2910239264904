//! Row id value objects for tasks and properties.

use super::errors::ValidationError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A type-safe wrapper for the row id of a task.
///
/// Task ids are SQLite row ids and therefore always positive.
///
/// # Example
///
/// ```
/// use ngram_fts::domain::TaskId;
///
/// let id = TaskId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(TaskId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(i64);

impl TaskId {
    /// Create a new TaskId, validating that it is positive.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NonPositiveId` for zero or negative ids.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::NonPositiveId(id));
        }
        Ok(Self(id))
    }

    /// Get the raw row id.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// A type-safe wrapper for the row id of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(i64);

impl PropertyId {
    /// Create a new PropertyId, validating that it is positive.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::NonPositiveId(id));
        }
        Ok(Self(id))
    }

    /// Get the raw row id.
    pub fn get(self) -> i64 {
        self.0
    }
}

fn positive_from_sql(value: ValueRef<'_>) -> FromSqlResult<i64> {
    let raw = i64::column_result(value)?;
    if raw <= 0 {
        return Err(FromSqlError::Other(Box::new(ValidationError::NonPositiveId(
            raw,
        ))));
    }
    Ok(raw)
}

impl ToSql for TaskId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for TaskId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        positive_from_sql(value).map(Self)
    }
}

impl ToSql for PropertyId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for PropertyId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        positive_from_sql(value).map(Self)
    }
}

// Serde support - serialize as plain integers
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        TaskId::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for PropertyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        PropertyId::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_task_id_valid() {
        let id = TaskId::new(7).unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn test_ids_reject_non_positive() {
        assert_eq!(TaskId::new(0), Err(ValidationError::NonPositiveId(0)));
        assert!(PropertyId::new(-3).is_err());
    }

    #[test]
    fn test_task_id_display() {
        let id = TaskId::new(123).unwrap();
        assert_eq!(format!("{}", id), "123");
    }

    #[test]
    fn test_task_id_serde() {
        let id = TaskId::new(5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let parsed: TaskId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<TaskId>("0").is_err());
    }

    #[test]
    fn test_sql_round_trip_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let id = PropertyId::new(99).unwrap();
        let back: PropertyId = conn
            .query_row("SELECT ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(back, id);

        let bad: rusqlite::Result<TaskId> = conn.query_row("SELECT 0", [], |row| row.get(0));
        assert!(bad.is_err());
    }
}
