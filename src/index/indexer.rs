//! Keeps the ngram index and relation table consistent with task writes.
//!
//! Every method expects to run inside the caller's transaction; nothing
//! here begins, commits or retries one.

use super::{NGramIndex, RelationStore};
use crate::domain::{FieldKind, PropertyId, TaskId};
use crate::error::FtsResult;
use crate::metrics::FtsMetrics;
use crate::models::{Task, TaskPatch};
use crate::ngram::Tokenizer;
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{debug, info};

/// Counts reported by [`FtsIndexer::backfill`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillStats {
    pub tasks: usize,
    pub properties: usize,
}

/// Tokenizes task fields and rewrites their relations.
#[derive(Clone)]
pub struct FtsIndexer {
    tokenizer: Arc<dyn Tokenizer>,
    ngrams: NGramIndex,
    relations: RelationStore,
    metrics: FtsMetrics,
}

impl FtsIndexer {
    /// Create an indexer using `tokenizer`, which must be the same one the
    /// search engine uses.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, metrics: FtsMetrics) -> Self {
        Self {
            tokenizer,
            ngrams: NGramIndex::new(metrics.clone()),
            relations: RelationStore::new(metrics.clone()),
            metrics,
        }
    }

    /// Index the searchable fields of a newly inserted task.
    ///
    /// Absent and empty fields are skipped.
    pub fn insert_task_entries(&self, conn: &Connection, task_id: TaskId, task: &Task) -> FtsResult<()> {
        for (kind, value) in task.searchable_fields() {
            self.index_field(conn, task_id, None, kind, value)?;
        }
        Ok(())
    }

    /// Re-index the searchable fields present in `patch`.
    ///
    /// Each present field has its old relations removed before the new
    /// value is indexed; fields missing from the patch are left alone.
    pub fn update_task_entries(&self, conn: &Connection, task_id: TaskId, patch: &TaskPatch) -> FtsResult<()> {
        for (kind, value) in patch.searchable_fields() {
            self.relations.remove_relations(conn, task_id, None, kind)?;
            self.index_field(conn, task_id, None, kind, value)?;
        }
        Ok(())
    }

    /// Replace the searchable entry of a property.
    ///
    /// Passing `None` or an empty string clears the entry.
    pub fn update_property_entry(
        &self,
        conn: &Connection,
        task_id: TaskId,
        property_id: PropertyId,
        text: Option<&str>,
    ) -> FtsResult<()> {
        self.relations
            .remove_relations(conn, task_id, Some(property_id), FieldKind::Property)?;
        self.index_field(conn, task_id, Some(property_id), FieldKind::Property, text)
    }

    /// Remove every relation of a deleted task.
    pub fn on_task_deleted(&self, conn: &Connection, task_id: TaskId) -> FtsResult<usize> {
        let removed = self.relations.remove_task(conn, task_id)?;
        debug!(task_id = %task_id, removed, "Removed relations of deleted task");
        Ok(removed)
    }

    /// Remove the relations of a deleted property.
    pub fn on_property_deleted(
        &self,
        conn: &Connection,
        task_id: TaskId,
        property_id: PropertyId,
    ) -> FtsResult<usize> {
        let removed = self.relations.remove_property(conn, task_id, property_id)?;
        debug!(task_id = %task_id, property_id = %property_id, removed, "Removed relations of deleted property");
        Ok(removed)
    }

    /// Index every existing task and property through the insert path.
    ///
    /// Used once, when the search tables are added to a populated store.
    pub fn backfill(&self, conn: &Connection) -> FtsResult<BackfillStats> {
        let mut stats = BackfillStats::default();

        let mut stmt = conn.prepare("SELECT _id, title, description, location FROM Tasks")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(0)?;
            let task = Task {
                id: Some(task_id),
                title: row.get(1)?,
                description: row.get(2)?,
                location: row.get(3)?,
                ..Default::default()
            };
            self.insert_task_entries(conn, task_id, &task)?;
            stats.tasks += 1;
        }

        let mut stmt = conn.prepare("SELECT task_id, property_id, searchable FROM Properties")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(0)?;
            let property_id: PropertyId = row.get(1)?;
            let text: Option<String> = row.get(2)?;
            self.index_field(conn, task_id, Some(property_id), FieldKind::Property, text.as_deref())?;
            stats.properties += 1;
        }

        info!(tasks = stats.tasks, properties = stats.properties, "Backfilled search index");
        Ok(stats)
    }

    fn index_field(
        &self,
        conn: &Connection,
        task_id: TaskId,
        property_id: Option<PropertyId>,
        kind: FieldKind,
        text: Option<&str>,
    ) -> FtsResult<()> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let tokens = self.tokenizer.tokenize(text);
        let ngram_ids = self.ngrams.upsert_all(conn, &tokens)?;
        let written = self
            .relations
            .add_relations(conn, task_id, property_id, kind, &ngram_ids)?;
        self.metrics.record_field_indexed();

        debug!(
            task_id = %task_id,
            field = kind.display_name(),
            tokens = tokens.len(),
            written,
            "Indexed field"
        );
        Ok(())
    }
}
