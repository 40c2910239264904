//! Store version handling for the search tables.

use super::{BackfillStats, FtsIndexer};
use crate::error::{FtsError, FtsResult};
use crate::schema::{self, FTS_SCHEMA_VERSION};
use rusqlite::Connection;
use tracing::info;

/// What [`migrate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Fresh database; all tables created, nothing to backfill.
    Created,
    /// Search tables added to an existing store and its rows indexed.
    Upgraded { from: i64, backfill: BackfillStats },
    /// Already at the current version.
    UpToDate,
}

/// Bring the store to [`FTS_SCHEMA_VERSION`].
///
/// - version 0: create the task and search tables
/// - versions 1 through 7: add the search tables and backfill every
///   existing task and property once
/// - current version: nothing to do
///
/// Run inside a transaction so a failed backfill leaves the version
/// untouched.
///
/// # Errors
///
/// `FtsError::UnsupportedSchemaVersion` if the store is newer than this
/// crate.
pub fn migrate(conn: &Connection, indexer: &FtsIndexer) -> FtsResult<MigrationOutcome> {
    let version = schema::schema_version(conn)?;

    let outcome = match version {
        0 => {
            schema::create_task_tables(conn)?;
            schema::create_fts_tables(conn)?;
            MigrationOutcome::Created
        }
        v if v < FTS_SCHEMA_VERSION => {
            schema::create_task_tables(conn)?;
            schema::create_fts_tables(conn)?;
            let backfill = indexer.backfill(conn)?;
            MigrationOutcome::Upgraded { from: v, backfill }
        }
        v if v == FTS_SCHEMA_VERSION => return Ok(MigrationOutcome::UpToDate),
        found => {
            return Err(FtsError::UnsupportedSchemaVersion {
                found,
                supported: FTS_SCHEMA_VERSION,
            })
        }
    };

    schema::set_schema_version(conn, FTS_SCHEMA_VERSION)?;
    info!(from = version, to = FTS_SCHEMA_VERSION, ?outcome, "Migrated task store");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FtsMetrics;
    use crate::ngram::NGramGenerator;
    use std::sync::Arc;

    fn indexer() -> FtsIndexer {
        FtsIndexer::new(Arc::new(NGramGenerator::default()), FtsMetrics::new())
    }

    #[test]
    fn test_fresh_database_is_created() {
        let conn = Connection::open_in_memory().unwrap();
        let outcome = migrate(&conn, &indexer()).unwrap();
        assert_eq!(outcome, MigrationOutcome::Created);
        assert_eq!(schema::schema_version(&conn).unwrap(), FTS_SCHEMA_VERSION);

        assert_eq!(migrate(&conn, &indexer()).unwrap(), MigrationOutcome::UpToDate);
    }

    #[test]
    fn test_old_store_is_backfilled() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_task_tables(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO Tasks (title, description) VALUES ('pay rent', 'landlord');
             INSERT INTO Tasks (title) VALUES ('call mom');
             PRAGMA user_version = 7;",
        )
        .unwrap();

        let outcome = migrate(&conn, &indexer()).unwrap();
        assert_eq!(
            outcome,
            MigrationOutcome::Upgraded {
                from: 7,
                backfill: BackfillStats {
                    tasks: 2,
                    properties: 0
                }
            }
        );
        let relations: i64 = conn
            .query_row("SELECT count(*) FROM FTS_Content", [], |row| row.get(0))
            .unwrap();
        assert!(relations > 0);
    }

    #[test]
    fn test_newer_store_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        schema::set_schema_version(&conn, FTS_SCHEMA_VERSION + 1).unwrap();
        let result = migrate(&conn, &indexer());
        assert!(matches!(
            result,
            Err(FtsError::UnsupportedSchemaVersion { found: 9, .. })
        ));
    }
}
