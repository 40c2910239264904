//! Sample tasks used across the integration tests.

use ngram_fts::Task;

/// A task with only a title.
pub fn titled(title: &str) -> Task {
    Task::new(title)
}

/// A task with every searchable field filled in.
pub fn full_task(title: &str, description: &str, location: &str) -> Task {
    Task::new(title)
        .with_description(description)
        .with_location(location)
}

/// Tasks covering a handful of unrelated topics.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        full_task("weekly report meeting", "summarize the sales numbers", "office"),
        full_task("buy groceries", "milk, eggs and bread", "market"),
        full_task("dentist appointment", "annual checkup", "downtown clinic").with_priority(1),
        full_task("quarterly report", "finance review", "board room").with_priority(2),
        titled("call mom"),
    ]
}
