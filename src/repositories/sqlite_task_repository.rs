use crate::config::Config;
use crate::domain::{PropertyId, TaskId};
use crate::error::{FtsError, FtsResult};
use crate::index::{migrate, FtsIndexer};
use crate::metrics::FtsMetrics;
use crate::models::{Property, Task, TaskPatch};
use crate::ngram::{NGramGenerator, Tokenizer};
use crate::repositories::traits::TaskRepository;
use crate::search::{SearchEngine, SearchHit, SearchRequest};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Task repository backed by a single SQLite connection.
///
/// Writes are serialized through the connection lock; each one runs in
/// its own transaction together with the index maintenance it triggers.
pub struct SqliteTaskRepository {
    conn: Mutex<Connection>,
    indexer: FtsIndexer,
    engine: SearchEngine,
    metrics: FtsMetrics,
}

impl SqliteTaskRepository {
    /// Open (or create) the database named in `config` and migrate it.
    pub fn open(config: &Config) -> FtsResult<Self> {
        let conn = Connection::open(&config.database_path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        info!(path = %config.database_path, "Opened task store");
        Self::from_connection(conn)
    }

    /// A fresh in-memory store.
    pub fn open_in_memory() -> FtsResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an open connection using the standard trigram tokenizer.
    pub fn from_connection(conn: Connection) -> FtsResult<Self> {
        Self::with_tokenizer(conn, Arc::new(NGramGenerator::default()))
    }

    /// Wrap an open connection, indexing and searching with `tokenizer`.
    pub fn with_tokenizer(mut conn: Connection, tokenizer: Arc<dyn Tokenizer>) -> FtsResult<Self> {
        let metrics = FtsMetrics::new();
        let indexer = FtsIndexer::new(tokenizer.clone(), metrics.clone());
        let engine = SearchEngine::new(tokenizer, metrics.clone());

        let tx = conn.transaction()?;
        migrate(&tx, &indexer)?;
        tx.commit()?;

        Ok(Self {
            conn: Mutex::new(conn),
            indexer,
            engine,
            metrics,
        })
    }

    /// Counters shared by indexing and search.
    pub fn metrics(&self) -> &FtsMetrics {
        &self.metrics
    }

    /// Run a read-only closure against the underlying connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> FtsResult<T>) -> FtsResult<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    fn lock(&self) -> FtsResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FtsError::Consistency("connection lock poisoned".to_string()))
    }

    /// Run `f` in a transaction, committing only if it succeeds.
    fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> FtsResult<T>) -> FtsResult<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn task_exists(conn: &Connection, id: TaskId) -> FtsResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM Tasks WHERE _id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn ensure_task(conn: &Connection, id: TaskId) -> FtsResult<()> {
    if task_exists(conn, id)? {
        Ok(())
    } else {
        Err(FtsError::NotFound(format!("task {}", id)))
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn insert(&self, task: &Task) -> FtsResult<TaskId> {
        self.write(|tx| {
            tx.execute(
                "INSERT INTO Tasks (title, description, location, priority, status, _deleted, last_modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.title,
                    task.description,
                    task.location,
                    task.priority,
                    task.status,
                    task.deleted,
                    now_millis(),
                ],
            )?;
            let id = TaskId::new(tx.last_insert_rowid())?;
            self.indexer.insert_task_entries(tx, id, task)?;
            debug!(task_id = %id, "Inserted task");
            Ok(id)
        })
    }

    fn get(&self, id: TaskId) -> FtsResult<Task> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT _id, title, description, location, priority, status, _deleted, last_modified \
             FROM Tasks WHERE _id = ?1",
            [id],
            |row| {
                Ok(Task {
                    id: Some(row.get(0)?),
                    title: row.get(1)?,
                    description: row.get(2)?,
                    location: row.get(3)?,
                    priority: row.get(4)?,
                    status: row.get(5)?,
                    deleted: row.get(6)?,
                    last_modified: row.get(7)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| FtsError::NotFound(format!("task {}", id)))
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> FtsResult<()> {
        self.write(|tx| {
            let mut assignments: Vec<(&str, Value)> = Vec::new();
            if let Some(title) = &patch.title {
                assignments.push(("title", title.clone().into()));
            }
            if let Some(description) = &patch.description {
                assignments.push(("description", description.clone().into()));
            }
            if let Some(location) = &patch.location {
                assignments.push(("location", location.clone().into()));
            }
            if let Some(priority) = patch.priority {
                assignments.push(("priority", priority.into()));
            }
            if let Some(status) = patch.status {
                assignments.push(("status", status.into()));
            }
            assignments.push(("last_modified", now_millis().into()));

            let set_clause = assignments
                .iter()
                .map(|(column, _)| format!("{column} = ?"))
                .collect::<Vec<_>>()
                .join(", ");
            let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
            values.push(id.get().into());

            let updated = tx.execute(
                &format!("UPDATE Tasks SET {set_clause} WHERE _id = ?"),
                params_from_iter(values.iter()),
            )?;
            if updated == 0 {
                return Err(FtsError::NotFound(format!("task {}", id)));
            }

            self.indexer.update_task_entries(tx, id, patch)?;
            debug!(task_id = %id, "Updated task");
            Ok(())
        })
    }

    fn mark_deleted(&self, id: TaskId) -> FtsResult<()> {
        self.write(|tx| {
            let updated = tx.execute(
                "UPDATE Tasks SET _deleted = 1, last_modified = ?1 WHERE _id = ?2",
                params![now_millis(), id],
            )?;
            if updated == 0 {
                return Err(FtsError::NotFound(format!("task {}", id)));
            }
            Ok(())
        })
    }

    fn delete(&self, id: TaskId) -> FtsResult<()> {
        self.write(|tx| {
            ensure_task(tx, id)?;
            tx.execute("DELETE FROM Properties WHERE task_id = ?1", [id])?;
            tx.execute("DELETE FROM Tasks WHERE _id = ?1", [id])?;
            self.indexer.on_task_deleted(tx, id)?;
            debug!(task_id = %id, "Deleted task");
            Ok(())
        })
    }

    fn insert_property(
        &self,
        task: TaskId,
        mimetype: &str,
        searchable: Option<&str>,
    ) -> FtsResult<PropertyId> {
        if mimetype.trim().is_empty() {
            return Err(FtsError::InvalidArgument(
                "property mimetype must not be empty".to_string(),
            ));
        }
        self.write(|tx| {
            ensure_task(tx, task)?;
            tx.execute(
                "INSERT INTO Properties (task_id, mimetype, searchable) VALUES (?1, ?2, ?3)",
                params![task, mimetype, searchable],
            )?;
            let property = PropertyId::new(tx.last_insert_rowid())?;
            self.indexer
                .update_property_entry(tx, task, property, searchable)?;
            Ok(property)
        })
    }

    fn update_property(
        &self,
        task: TaskId,
        property: PropertyId,
        searchable: Option<&str>,
    ) -> FtsResult<()> {
        self.write(|tx| {
            let updated = tx.execute(
                "UPDATE Properties SET searchable = ?1 WHERE property_id = ?2 AND task_id = ?3",
                params![searchable, property, task],
            )?;
            if updated == 0 {
                return Err(FtsError::NotFound(format!(
                    "property {} of task {}",
                    property, task
                )));
            }
            self.indexer
                .update_property_entry(tx, task, property, searchable)
        })
    }

    fn delete_property(&self, task: TaskId, property: PropertyId) -> FtsResult<()> {
        self.write(|tx| {
            let deleted = tx.execute(
                "DELETE FROM Properties WHERE property_id = ?1 AND task_id = ?2",
                params![property, task],
            )?;
            if deleted == 0 {
                return Err(FtsError::NotFound(format!(
                    "property {} of task {}",
                    property, task
                )));
            }
            self.indexer.on_property_deleted(tx, task, property)?;
            Ok(())
        })
    }

    fn properties(&self, task: TaskId) -> FtsResult<Vec<Property>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT property_id, task_id, mimetype, searchable FROM Properties \
             WHERE task_id = ?1 ORDER BY property_id",
        )?;
        let rows = stmt.query_map([task], |row| {
            Ok(Property {
                id: row.get(0)?,
                task_id: row.get(1)?,
                mimetype: row.get(2)?,
                searchable: row.get(3)?,
            })
        })?;
        let mut properties = Vec::new();
        for property in rows {
            properties.push(property?);
        }
        Ok(properties)
    }

    fn search(&self, request: &SearchRequest) -> FtsResult<Vec<SearchHit>> {
        let conn = self.lock()?;
        self.engine.search(&conn, request)
    }
}
