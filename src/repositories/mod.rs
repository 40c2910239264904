mod sqlite_task_repository;
mod traits;

pub use sqlite_task_repository::SqliteTaskRepository;
pub use traits::TaskRepository;
