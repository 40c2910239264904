use crate::domain::{PropertyId, TaskId};
use crate::error::FtsResult;
use crate::models::{Property, Task, TaskPatch};
use crate::search::{SearchHit, SearchRequest};

/// Repository for tasks, their properties, and searching them.
///
/// Every write runs in one transaction that also updates the search
/// index, so a search never observes a task without its relations or
/// relations of a task that is gone.
pub trait TaskRepository: Send + Sync {
    /// Store a new task and index its title, description and location.
    fn insert(&self, task: &Task) -> FtsResult<TaskId>;

    /// Retrieve a single task by id.
    fn get(&self, id: TaskId) -> FtsResult<Task>;

    /// Apply a partial update, re-indexing only the fields it touches.
    fn update(&self, id: TaskId, patch: &TaskPatch) -> FtsResult<()>;

    /// Flag a task as deleted without removing it. Search skips it.
    fn mark_deleted(&self, id: TaskId) -> FtsResult<()>;

    /// Remove a task, its properties and all of their relations.
    fn delete(&self, id: TaskId) -> FtsResult<()>;

    /// Attach a property to a task and index its searchable text.
    fn insert_property(
        &self,
        task: TaskId,
        mimetype: &str,
        searchable: Option<&str>,
    ) -> FtsResult<PropertyId>;

    /// Replace the searchable text of a property. `None` clears it.
    fn update_property(
        &self,
        task: TaskId,
        property: PropertyId,
        searchable: Option<&str>,
    ) -> FtsResult<()>;

    /// Remove a property and its relations.
    fn delete_property(&self, task: TaskId, property: PropertyId) -> FtsResult<()>;

    /// List the properties of a task.
    fn properties(&self, task: TaskId) -> FtsResult<Vec<Property>>;

    /// Search non-deleted tasks.
    fn search(&self, request: &SearchRequest) -> FtsResult<Vec<SearchHit>>;
}
