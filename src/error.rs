//! Error types for the n-gram full-text search index.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur while indexing or searching.
#[derive(Error, Debug)]
pub enum FtsError {
    /// The underlying SQLite store reported an error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A required argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The query produced no tokens, so no score can be computed
    #[error("Search query contains no searchable characters")]
    EmptyQuery,

    /// A column expected by the query layer is absent from the row
    #[error("Column not found in result row: {0}")]
    MissingColumn(String),

    /// A column holds a value of an unexpected type
    #[error("Column {column} does not hold a value of type {expected}")]
    InvalidColumnType {
        column: String,
        expected: &'static str,
    },

    /// The index is internally inconsistent (e.g. a conflicting ngram vanished)
    #[error("Index consistency failure: {0}")]
    Consistency(String),

    /// The database was written by a newer schema than this crate understands
    #[error("Unsupported schema version {found} (newest supported: {supported})")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },

    /// Requested row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Domain value validation failed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with FtsError
pub type FtsResult<T> = Result<T, FtsError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
