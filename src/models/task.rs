//! Task records of the owning store.

use crate::domain::{FieldKind, TaskId};
use serde::{Deserialize, Serialize};

/// A task row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Task {
    /// Row id, `None` until the task has been stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,

    pub title: Option<String>,

    pub description: Option<String>,

    pub location: Option<String>,

    pub priority: Option<i64>,

    /// Status code (0 = needs action)
    pub status: i64,

    /// Soft-deleted tasks are kept in the store but never returned by search
    pub deleted: bool,

    /// Last write, milliseconds since the Unix epoch (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl Task {
    /// Create an unsaved task with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// The searchable fields of this task with their current values.
    pub fn searchable_fields(&self) -> [(FieldKind, Option<&str>); 3] {
        [
            (FieldKind::Title, self.title.as_deref()),
            (FieldKind::Description, self.description.as_deref()),
            (FieldKind::Location, self.location.as_deref()),
        ]
    }
}

/// A partial update of a task.
///
/// Only fields that are present are written. A present field holding
/// `None` clears the column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub priority: Option<Option<i64>>,
    pub status: Option<i64>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    pub fn clear_title(mut self) -> Self {
        self.title = Some(None);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(Some(location.into()));
        self
    }

    pub fn clear_location(mut self) -> Self {
        self.location = Some(None);
        self
    }

    pub fn priority(mut self, priority: Option<i64>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    /// Searchable fields present in this patch, with their new values.
    pub fn searchable_fields(&self) -> Vec<(FieldKind, Option<&str>)> {
        [
            (FieldKind::Title, &self.title),
            (FieldKind::Description, &self.description),
            (FieldKind::Location, &self.location),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_ref().map(|v| (kind, v.as_deref())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("weekly report")
            .with_description("numbers")
            .with_priority(3);
        assert_eq!(task.title.as_deref(), Some("weekly report"));
        assert_eq!(task.priority, Some(3));
        assert_eq!(task.location, None);
    }

    #[test]
    fn test_task_searchable_fields() {
        let task = Task::new("a").with_location("b");
        let fields = task.searchable_fields();
        assert_eq!(fields[0], (FieldKind::Title, Some("a")));
        assert_eq!(fields[1], (FieldKind::Description, None));
        assert_eq!(fields[2], (FieldKind::Location, Some("b")));
    }

    #[test]
    fn test_patch_only_yields_present_fields() {
        let patch = TaskPatch::new().title("new").clear_location();
        assert_eq!(
            patch.searchable_fields(),
            vec![(FieldKind::Title, Some("new")), (FieldKind::Location, None)]
        );
        assert!(TaskPatch::new().priority(Some(1)).searchable_fields().is_empty());
    }

    #[test]
    fn test_task_serialization_skips_unsaved_id() {
        let json = serde_json::to_value(Task::new("x")).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["title"], "x");
    }
}
