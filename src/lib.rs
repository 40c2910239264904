//! ngram-fts - fuzzy full-text search for a SQLite task store.
//!
//! Task text is split into character n-grams which are stored once in a
//! token table and linked to the tasks that contain them. A search
//! tokenizes the query the same way and ranks tasks by the share of query
//! n-grams they contain.
//!
//! # Architecture
//!
//! - **ngram**: Tokenizer contract and the default n-gram generator
//! - **index**: Token table, relation table, indexer and schema migration
//! - **search**: Query planning and execution
//! - **repositories**: Task store that keeps the index in step with writes
//! - **models**: Tasks and properties
//! - **domain**: Row ids and field kinds
//! - **schema**: Table names and DDL
//! - **metrics**: Indexing and search counters
//! - **config**: Configuration from environment variables
//! - **error**: Error types

pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod ngram;
pub mod repositories;
pub mod schema;
pub mod search;

pub use config::Config;
pub use domain::{FieldKind, PropertyId, TaskId};
pub use error::{ConfigError, FtsError, FtsResult};
pub use index::{FtsIndexer, MigrationOutcome};
pub use metrics::{FtsMetrics, MetricsSummary};
pub use models::{Property, Task, TaskPatch};
pub use ngram::{NGramGenerator, Tokenizer};
pub use repositories::{SqliteTaskRepository, TaskRepository};
pub use search::{SearchEngine, SearchHit, SearchRequest};
