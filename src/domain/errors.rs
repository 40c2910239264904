//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Row ids handed out by SQLite are always positive.
    NonPositiveId(i64),

    /// The stored field kind code is not one of the known kinds.
    UnknownFieldKind(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "Row id must be positive, got {}", id),
            Self::UnknownFieldKind(code) => write!(f, "Unknown field kind code: {}", code),
        }
    }
}

impl std::error::Error for ValidationError {}
