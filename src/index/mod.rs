//! The n-gram index: token table, relation table, the indexer that keeps
//! them in step with task writes, and the schema migration that introduces
//! them.

mod indexer;
mod migration;
mod ngram_index;
mod relation_store;

pub use indexer::{BackfillStats, FtsIndexer};
pub use migration::{migrate, MigrationOutcome};
pub use ngram_index::NGramIndex;
pub use relation_store::RelationStore;
