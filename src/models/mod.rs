//! Data models of the task store whose text is indexed.

pub mod property;
pub mod task;

pub use property::Property;
pub use task::{Task, TaskPatch};
