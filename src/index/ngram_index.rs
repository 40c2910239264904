//! Deduplicated store mapping ngram text to a stable id.

use crate::error::{FtsError, FtsResult};
use crate::metrics::FtsMetrics;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeSet;
use tracing::trace;

/// Access to the `FTS_Ngram` table.
///
/// Rows are never deleted; an ngram outlives every relation that refers
/// to it.
#[derive(Debug, Clone, Default)]
pub struct NGramIndex {
    metrics: FtsMetrics,
}

impl NGramIndex {
    /// Create an index handle reporting to `metrics`.
    pub fn new(metrics: FtsMetrics) -> Self {
        Self { metrics }
    }

    /// Return the id of `text`, inserting it first if it is new.
    ///
    /// The insert ignores unique-constraint conflicts. A conflict is never
    /// assumed to report the existing id; the id is always looked up by
    /// text afterwards.
    ///
    /// # Errors
    ///
    /// `FtsError::InvalidArgument` for empty text, and
    /// `FtsError::Consistency` if a conflicting row cannot be found again.
    pub fn upsert(&self, conn: &Connection, text: &str) -> FtsResult<i64> {
        if text.is_empty() {
            return Err(FtsError::InvalidArgument(
                "ngram text must not be empty".to_string(),
            ));
        }

        let inserted = conn
            .prepare_cached("INSERT OR IGNORE INTO FTS_Ngram (ngram_text) VALUES (?1)")?
            .execute([text])?;
        if inserted == 1 {
            self.metrics.record_ngram_inserted();
            return Ok(conn.last_insert_rowid());
        }

        trace!(ngram = %text, "ngram exists, resolving id by lookup");
        self.metrics.record_ngram_conflict();
        Self::lookup(conn, text)?.ok_or_else(|| {
            FtsError::Consistency(format!(
                "ngram '{}' conflicted on insert but could not be found",
                text
            ))
        })
    }

    /// Upsert every token and return the set of their ids.
    pub fn upsert_all(&self, conn: &Connection, tokens: &BTreeSet<String>) -> FtsResult<BTreeSet<i64>> {
        tokens.iter().map(|token| self.upsert(conn, token)).collect()
    }

    /// Look up the id of `text` without inserting.
    pub fn lookup(conn: &Connection, text: &str) -> FtsResult<Option<i64>> {
        let id = conn
            .prepare_cached("SELECT ngram_id FROM FTS_Ngram WHERE ngram_text = ?1")?
            .query_row([text], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    /// Number of distinct ngrams stored.
    pub fn count(conn: &Connection) -> FtsResult<usize> {
        let count: i64 = conn.query_row("SELECT count(*) FROM FTS_Ngram", [], |row| row.get(0))?;
        Ok(count as usize)
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

    #[test]
    fn test_upsert_assigns_stable_ids() {
        let conn = setup();
        let index = NGramIndex::default();

        let first = index.upsert(&conn, "rep").unwrap();
        let second = index.upsert(&conn, "epo").unwrap();
        assert_ne!(first, second);

        assert_eq!(index.upsert(&conn, "rep").unwrap(), first);
        assert_eq!(NGramIndex::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_conflict_resolves_by_lookup() {
        let conn = setup();
        let metrics = FtsMetrics::new();
        let index = NGramIndex::new(metrics.clone());

        let id = index.upsert(&conn, "abc").unwrap();
        // an unrelated insert moves last_insert_rowid away from `id`
        index.upsert(&conn, "xyz").unwrap();
        assert_eq!(index.upsert(&conn, "abc").unwrap(), id);

        assert_eq!(metrics.ngrams_inserted_total(), 2);
        assert_eq!(metrics.ngram_conflicts_total(), 1);
    }

    #[test]
    fn test_upsert_all() {
        let conn = setup();
        let index = NGramIndex::default();
        let tokens: BTreeSet<String> = ["abc", "bcd", "cde"].iter().map(|s| s.to_string()).collect();

        let ids = index.upsert_all(&conn, &tokens).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(index.upsert_all(&conn, &tokens).unwrap(), ids);
    }

    #[test]
    fn test_lookup_missing() {
        let conn = setup();
        assert_eq!(NGramIndex::lookup(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_empty_text_rejected() {
        let conn = setup();
        let result = NGramIndex::default().upsert(&conn, "");
        assert!(matches!(result, Err(FtsError::InvalidArgument(_))));
    }

    #[test]
    fn test_consistency_error_when_row_missing() {
        let conn = setup();
        // a trigger that swallows inserts makes the row vanish
        conn.execute_batch(
            "CREATE TRIGGER swallow BEFORE INSERT ON FTS_Ngram BEGIN SELECT RAISE(IGNORE); END;",
        )
        .unwrap();
        let result = NGramIndex::default().upsert(&conn, "abc");
        assert!(matches!(result, Err(FtsError::Consistency(_))));
    }
}
