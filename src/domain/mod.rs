//! Domain value objects and types.
//!
//! Type-safe wrappers for row ids and the field kind enumeration that is
//! persisted in the relation table.

pub mod errors;
pub mod field_kind;
pub mod row_id;

pub use errors::ValidationError;
pub use field_kind::FieldKind;
pub use row_id::{PropertyId, TaskId};
