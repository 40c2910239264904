//! Property records attached to tasks.

use crate::domain::{PropertyId, TaskId};
use serde::{Deserialize, Serialize};

/// A typed property of a task (attendee, alarm, category, ...).
///
/// Only `searchable` takes part in full-text search; what it contains is up
/// to the property type identified by `mimetype`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,

    pub task_id: TaskId,

    pub mimetype: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable: Option<String>,
}
