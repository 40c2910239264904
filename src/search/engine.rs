//! Executes search requests against the relation and ngram tables.

use super::hit::{to_json, SearchHit};
use super::query::{build_plan, EntityView, MatchPath, SearchRequest, MATCHED_NGRAM_COLUMN};
use crate::domain::TaskId;
use crate::error::{FtsError, FtsResult};
use crate::metrics::{FtsMetrics, SearchTimer};
use crate::ngram::Tokenizer;
use crate::schema::SCORE_COLUMN;
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Ranks entities by the share of query ngrams they contain.
///
/// Read-only; any number of searches may run at once on separate
/// connections.
#[derive(Clone)]
pub struct SearchEngine {
    tokenizer: Arc<dyn Tokenizer>,
    view: EntityView,
    metrics: FtsMetrics,
}

impl SearchEngine {
    /// Create an engine over the default task view.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, metrics: FtsMetrics) -> Self {
        Self {
            tokenizer,
            view: EntityView::default(),
            metrics,
        }
    }

    /// Search a different entity view.
    pub fn with_view(mut self, view: EntityView) -> Self {
        self.view = view;
        self
    }

    /// Run a search.
    ///
    /// Returns one hit per entity, best score first.
    ///
    /// # Errors
    ///
    /// - `FtsError::EmptyQuery` if the query has no searchable characters
    /// - `FtsError::MissingColumn` if the result set lacks the id, score or
    ///   ngram column
    /// - `FtsError::Database` for SQL errors, including a malformed filter
    ///   or a view without the configured columns
    pub fn search(&self, conn: &Connection, request: &SearchRequest) -> FtsResult<Vec<SearchHit>> {
        let timer = SearchTimer::new(self.metrics.clone());

        let tokens = self.tokenizer.tokenize(request.trimmed_query());
        let plan = build_plan(&self.view, request, &tokens)?;
        debug!(
            query = %request.query,
            tokens = tokens.len(),
            path = ?plan.path,
            "Executing search"
        );

        let mut stmt = conn.prepare(&plan.sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let id_idx = column_position(&names, &self.view.id_column)?;
        // The synthetic columns follow the view's own, which may reuse a name.
        let ngram_idx = last_column_position(&names, MATCHED_NGRAM_COLUMN)?;
        let score_idx = last_column_position(&names, SCORE_COLUMN)?;

        let mut rows = stmt.query(params_from_iter(plan.params.iter()))?;
        let mut hits = Vec::new();
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(id_idx)?;
            let score: f64 = row.get(score_idx)?;
            let matched_ngram: String = row.get(ngram_idx)?;

            let mut values = BTreeMap::new();
            for (idx, name) in names.iter().enumerate() {
                if idx == ngram_idx || idx == score_idx {
                    continue;
                }
                values.insert(name.clone(), to_json(row.get_ref(idx)?));
            }

            hits.push(SearchHit {
                task_id,
                score,
                matched_ngram,
                values,
            });
        }

        debug!(results = hits.len(), "Search completed");
        timer.complete(plan.path == MatchPath::Prefix);
        Ok(hits)
    }
}

fn column_position(names: &[String], column: &str) -> FtsResult<usize> {
    names
        .iter()
        .position(|n| n == column)
        .ok_or_else(|| FtsError::MissingColumn(column.to_string()))
}

fn last_column_position(names: &[String], column: &str) -> FtsResult<usize> {
    names
        .iter()
        .rposition(|n| n == column)
        .ok_or_else(|| FtsError::MissingColumn(column.to_string()))
}
