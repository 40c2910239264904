//! Shared setup for the integration tests.
//!
//! Every test gets its own in-memory store, so tests can run in parallel.

#![allow(dead_code)]

pub mod fixtures;

use ngram_fts::index::RelationStore;
use ngram_fts::{SearchHit, SearchRequest, SqliteTaskRepository, TaskId, TaskRepository};

/// A fresh, migrated in-memory store.
pub fn memory_repo() -> SqliteTaskRepository {
    SqliteTaskRepository::open_in_memory().expect("in-memory store should open")
}

/// Run a plain query and return the hits.
pub fn search(repo: &SqliteTaskRepository, query: &str) -> Vec<SearchHit> {
    repo.search(&SearchRequest::new(query))
        .unwrap_or_else(|e| panic!("search for {query:?} failed: {e}"))
}

/// Ids of the hits, in ranking order.
pub fn hit_ids(hits: &[SearchHit]) -> Vec<TaskId> {
    hits.iter().map(|h| h.task_id).collect()
}

/// Number of relation rows pointing at `task`.
pub fn relation_count(repo: &SqliteTaskRepository, task: TaskId) -> usize {
    repo.with_connection(|conn| RelationStore::count_for_task(conn, task))
        .expect("relation count")
}

/// Total rows in a table.
pub fn table_count(repo: &SqliteTaskRepository, table: &str) -> i64 {
    repo.with_connection(|conn| {
        Ok(conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))?)
    })
    .expect("table count")
}

/// Relation rows whose task no longer exists.
pub fn orphaned_relations(repo: &SqliteTaskRepository) -> i64 {
    repo.with_connection(|conn| {
        Ok(conn.query_row(
            "SELECT count(*) FROM FTS_Content \
             WHERE fts_task_id NOT IN (SELECT _id FROM Tasks) \
             OR (fts_property_id IS NOT NULL \
                 AND fts_property_id NOT IN (SELECT property_id FROM Properties))",
            [],
            |row| row.get(0),
        )?)
    })
    .expect("orphan count")
}
