//! Kinds of searchable text stored in the relation table.

use super::errors::ValidationError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The category of searchable text a relation row belongs to.
///
/// The integer codes are persisted in `fts_type` and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Task title
    Title,
    /// Task description
    Description,
    /// Task location
    Location,
    /// Searchable text of a property row
    Property,
}

impl FieldKind {
    /// Persisted integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::Title => 1,
            Self::Description => 2,
            Self::Location => 3,
            Self::Property => 4,
        }
    }

    /// Decode a persisted integer code.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Self::Title),
            2 => Ok(Self::Description),
            3 => Ok(Self::Location),
            4 => Ok(Self::Property),
            other => Err(ValidationError::UnknownFieldKind(other)),
        }
    }

    /// Whether relations of this kind carry a property id.
    pub fn has_sub_entity(self) -> bool {
        matches!(self, Self::Property)
    }

    /// Get display name for the field kind.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Location => "location",
            Self::Property => "property",
        }
    }
}

impl ToSql for FieldKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for FieldKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        FieldKind::from_code(code).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(FieldKind::Title.code(), 1);
        assert_eq!(FieldKind::Description.code(), 2);
        assert_eq!(FieldKind::Location.code(), 3);
        assert_eq!(FieldKind::Property.code(), 4);
    }

    #[test]
    fn test_from_code() {
        for kind in [
            FieldKind::Title,
            FieldKind::Description,
            FieldKind::Location,
            FieldKind::Property,
        ] {
            assert_eq!(FieldKind::from_code(kind.code()), Ok(kind));
        }
        assert_eq!(
            FieldKind::from_code(9),
            Err(ValidationError::UnknownFieldKind(9))
        );
    }

    #[test]
    fn test_only_property_has_sub_entity() {
        assert!(FieldKind::Property.has_sub_entity());
        for kind in [FieldKind::Title, FieldKind::Description, FieldKind::Location] {
            assert!(!kind.has_sub_entity());
        }
    }
}
