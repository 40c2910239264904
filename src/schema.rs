//! Table and column names plus DDL for the search tables and the task store
//! they index.
//!
//! Column names of the search tables are shared with existing deployments
//! and must not change.

use crate::error::FtsResult;
use rusqlite::Connection;

/// Store version that introduced the n-gram search tables.
pub const FTS_SCHEMA_VERSION: i64 = 8;

/// Synthetic column holding the match ratio of a search hit.
pub const SCORE_COLUMN: &str = "score";

/// Columns of the task view that search relies on.
pub mod tasks {
    pub const VIEW: &str = "Task_View";
    pub const ID: &str = "_id";
    pub const DELETED: &str = "_deleted";
}

// NULL property ids are folded to -1 in the unique index, otherwise SQLite
// would treat every title/description/location row as distinct.
const SQL_CREATE_FTS_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS FTS_Content (
        fts_task_id INTEGER NOT NULL,
        fts_ngram_id INTEGER NOT NULL,
        fts_property_id INTEGER,
        fts_type INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS FTS_Ngram (
        ngram_id INTEGER PRIMARY KEY AUTOINCREMENT,
        ngram_text TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS FTS_Ngram_ngram_text_idx
        ON FTS_Ngram (ngram_text);
    CREATE INDEX IF NOT EXISTS FTS_Content_fts_ngram_id_idx
        ON FTS_Content (fts_ngram_id);
    CREATE INDEX IF NOT EXISTS FTS_Content_fts_task_id_idx
        ON FTS_Content (fts_task_id);
    CREATE UNIQUE INDEX IF NOT EXISTS FTS_Content_relation_idx
        ON FTS_Content (fts_task_id, fts_type, coalesce(fts_property_id, -1), fts_ngram_id);
";

const SQL_CREATE_TASK_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS Tasks (
        _id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        description TEXT,
        location TEXT,
        priority INTEGER,
        status INTEGER NOT NULL DEFAULT 0,
        _deleted INTEGER NOT NULL DEFAULT 0,
        last_modified INTEGER
    );
    CREATE TABLE IF NOT EXISTS Properties (
        property_id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id INTEGER NOT NULL,
        mimetype TEXT NOT NULL,
        searchable TEXT
    );
    CREATE INDEX IF NOT EXISTS Properties_task_id_idx ON Properties (task_id);
    CREATE VIEW IF NOT EXISTS Task_View AS SELECT * FROM Tasks;
";

/// Create the ngram and relation tables with their indices.
pub fn create_fts_tables(conn: &Connection) -> FtsResult<()> {
    conn.execute_batch(SQL_CREATE_FTS_TABLES)?;
    Ok(())
}

/// Create the task store tables and the task view.
pub fn create_task_tables(conn: &Connection) -> FtsResult<()> {
    conn.execute_batch(SQL_CREATE_TASK_TABLES)?;
    Ok(())
}

/// Read the store version from `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> FtsResult<i64> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

/// Persist the store version.
pub fn set_schema_version(conn: &Connection, version: i64) -> FtsResult<()> {
    // PRAGMA does not accept bound parameters
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    Ok(())
}
