//! Many-to-many relation between tasks (or their properties) and ngrams.

use crate::domain::{FieldKind, PropertyId, TaskId};
use crate::error::{FtsError, FtsResult};
use crate::metrics::FtsMetrics;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

/// Access to the `FTS_Content` table.
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    metrics: FtsMetrics,
}

impl RelationStore {
    /// Create a relation store handle reporting to `metrics`.
    pub fn new(metrics: FtsMetrics) -> Self {
        Self { metrics }
    }

    /// Relate every ngram id to the given task field.
    ///
    /// Rows that already exist are silently skipped. Returns the number of
    /// rows actually written.
    ///
    /// # Errors
    ///
    /// `FtsError::InvalidArgument` if `property` is given for a task field,
    /// or missing for [`FieldKind::Property`].
    pub fn add_relations(
        &self,
        conn: &Connection,
        task: TaskId,
        property: Option<PropertyId>,
        kind: FieldKind,
        ngram_ids: &BTreeSet<i64>,
    ) -> FtsResult<usize> {
        check_property_arg(kind, property)?;

        let mut stmt = conn.prepare_cached(
            "INSERT OR IGNORE INTO FTS_Content (fts_task_id, fts_ngram_id, fts_property_id, fts_type) \
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut written = 0;
        for ngram_id in ngram_ids {
            written += stmt.execute(params![task, ngram_id, property, kind])?;
        }
        self.metrics.record_relations_written(written);
        Ok(written)
    }

    /// Delete the relations of a task field.
    ///
    /// Without a property id every relation of `kind` for the task is
    /// removed, regardless of its property. Returns the number of rows
    /// deleted.
    pub fn remove_relations(
        &self,
        conn: &Connection,
        task: TaskId,
        property: Option<PropertyId>,
        kind: FieldKind,
    ) -> FtsResult<usize> {
        let removed = match property {
            Some(property) => conn
                .prepare_cached(
                    "DELETE FROM FTS_Content \
                     WHERE fts_task_id = ?1 AND fts_type = ?2 AND fts_property_id = ?3",
                )?
                .execute(params![task, kind, property])?,
            None => conn
                .prepare_cached("DELETE FROM FTS_Content WHERE fts_task_id = ?1 AND fts_type = ?2")?
                .execute(params![task, kind])?,
        };
        self.metrics.record_relations_removed(removed);
        Ok(removed)
    }

    /// Cascade cleanup for a deleted task.
    pub fn remove_task(&self, conn: &Connection, task: TaskId) -> FtsResult<usize> {
        let removed = conn
            .prepare_cached("DELETE FROM FTS_Content WHERE fts_task_id = ?1")?
            .execute([task])?;
        self.metrics.record_relations_removed(removed);
        Ok(removed)
    }

    /// Cascade cleanup for a deleted property.
    pub fn remove_property(
        &self,
        conn: &Connection,
        task: TaskId,
        property: PropertyId,
    ) -> FtsResult<usize> {
        let removed = conn
            .prepare_cached("DELETE FROM FTS_Content WHERE fts_task_id = ?1 AND fts_property_id = ?2")?
            .execute(params![task, property])?;
        self.metrics.record_relations_removed(removed);
        Ok(removed)
    }

    /// Number of relation rows referencing a task.
    pub fn count_for_task(conn: &Connection, task: TaskId) -> FtsResult<usize> {
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM FTS_Content WHERE fts_task_id = ?1",
            [task],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Ngram texts related to one field of a task.
    ///
    /// A `None` property matches every property of the task.
    pub fn ngrams_for(
        conn: &Connection,
        task: TaskId,
        property: Option<PropertyId>,
        kind: FieldKind,
    ) -> FtsResult<BTreeSet<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT FTS_Ngram.ngram_text FROM FTS_Content \
             JOIN FTS_Ngram ON (FTS_Ngram.ngram_id = FTS_Content.fts_ngram_id) \
             WHERE fts_task_id = ?1 AND fts_type = ?2 \
             AND (?3 IS NULL OR fts_property_id = ?3)",
        )?;
        let rows = stmt.query_map(params![task, kind, property], |row| row.get(0))?;
        let mut texts = BTreeSet::new();
        for text in rows {
            texts.insert(text?);
        }
        Ok(texts)
    }
}

fn check_property_arg(kind: FieldKind, property: Option<PropertyId>) -> FtsResult<()> {
    match (kind.has_sub_entity(), property) {
        (true, None) => Err(FtsError::InvalidArgument(
            "property relations require a property id".to_string(),
        )),
        (false, Some(property)) => Err(FtsError::InvalidArgument(format!(
            "{} relations cannot carry property id {}",
            kind.display_name(),
            property
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_fts_tables(&conn).unwrap();
        conn
    }

    fn task(id: i64) -> TaskId {
        TaskId::new(id).unwrap()
    }

    fn prop(id: i64) -> PropertyId {
        PropertyId::new(id).unwrap()
    }

    fn ids(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_add_relations_ignores_duplicates() {
        let conn = setup();
        let store = RelationStore::default();

        let written = store
            .add_relations(&conn, task(1), None, FieldKind::Title, &ids(&[1, 2, 3]))
            .unwrap();
        assert_eq!(written, 3);

        let written = store
            .add_relations(&conn, task(1), None, FieldKind::Title, &ids(&[2, 3, 4]))
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(RelationStore::count_for_task(&conn, task(1)).unwrap(), 4);
    }

    #[test]
    fn test_same_ngram_in_different_fields() {
        let conn = setup();
        let store = RelationStore::default();
        store
            .add_relations(&conn, task(1), None, FieldKind::Title, &ids(&[1]))
            .unwrap();
        store
            .add_relations(&conn, task(1), None, FieldKind::Location, &ids(&[1]))
            .unwrap();
        store
            .add_relations(&conn, task(1), Some(prop(5)), FieldKind::Property, &ids(&[1]))
            .unwrap();
        assert_eq!(RelationStore::count_for_task(&conn, task(1)).unwrap(), 3);
    }

    #[test]
    fn test_remove_relations_by_kind() {
        let conn = setup();
        let store = RelationStore::default();
        store
            .add_relations(&conn, task(1), None, FieldKind::Title, &ids(&[1, 2]))
            .unwrap();
        store
            .add_relations(&conn, task(1), None, FieldKind::Description, &ids(&[3]))
            .unwrap();

        let removed = store
            .remove_relations(&conn, task(1), None, FieldKind::Title)
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(RelationStore::count_for_task(&conn, task(1)).unwrap(), 1);
    }

    #[test]
    fn test_remove_relations_property_wildcard() {
        let conn = setup();
        let store = RelationStore::default();
        store
            .add_relations(&conn, task(1), Some(prop(1)), FieldKind::Property, &ids(&[1, 2]))
            .unwrap();
        store
            .add_relations(&conn, task(1), Some(prop(2)), FieldKind::Property, &ids(&[1]))
            .unwrap();

        let removed = store
            .remove_relations(&conn, task(1), Some(prop(1)), FieldKind::Property)
            .unwrap();
        assert_eq!(removed, 2);

        let removed = store
            .remove_relations(&conn, task(1), None, FieldKind::Property)
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_cascade_helpers() {
        let conn = setup();
        let store = RelationStore::default();
        store
            .add_relations(&conn, task(1), None, FieldKind::Title, &ids(&[1, 2]))
            .unwrap();
        store
            .add_relations(&conn, task(1), Some(prop(7)), FieldKind::Property, &ids(&[3]))
            .unwrap();
        store
            .add_relations(&conn, task(2), Some(prop(7)), FieldKind::Property, &ids(&[3]))
            .unwrap();

        assert_eq!(store.remove_property(&conn, task(1), prop(7)).unwrap(), 1);
        assert_eq!(RelationStore::count_for_task(&conn, task(2)).unwrap(), 1);

        assert_eq!(store.remove_task(&conn, task(1)).unwrap(), 2);
        assert_eq!(RelationStore::count_for_task(&conn, task(1)).unwrap(), 0);
    }

    #[test]
    fn test_property_argument_checked() {
        let conn = setup();
        let store = RelationStore::default();
        let missing = store.add_relations(&conn, task(1), None, FieldKind::Property, &ids(&[1]));
        assert!(matches!(missing, Err(FtsError::InvalidArgument(_))));

        let extra = store.add_relations(&conn, task(1), Some(prop(1)), FieldKind::Title, &ids(&[1]));
        assert!(matches!(extra, Err(FtsError::InvalidArgument(_))));
    }
}
