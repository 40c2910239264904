//! Search requests and the SQL they compile to.

use crate::error::{FtsError, FtsResult};
use crate::schema::{tasks, SCORE_COLUMN};
use rusqlite::types::Value;
use std::collections::BTreeSet;

/// Only entities scoring strictly above this ratio are returned.
pub const MIN_SCORE: f64 = 0.3;

/// Queries of at most this many characters use prefix matching instead of
/// n-gram overlap.
pub const SHORT_QUERY_MAX_CHARS: usize = 2;

/// Column alias carrying the matched ngram text.
pub const MATCHED_NGRAM_COLUMN: &str = "ngram_text";

/// A full-text search request.
///
/// `filter` is an SQL boolean expression over the entity view, using
/// positional `?` placeholders bound from `filter_args` in order.
/// `sort_order` is an SQL ordering term applied after the score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub filter: Option<String>,
    pub filter_args: Vec<Value>,
    pub sort_order: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Restrict results with an extra SQL condition.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Bind the next `?` of the filter.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.filter_args.push(value.into());
        self
    }

    /// Secondary ordering after the score.
    pub fn sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }

    /// The query with surrounding whitespace removed.
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// Whether this query takes the prefix path.
    pub fn is_short(&self) -> bool {
        self.trimmed_query().chars().count() <= SHORT_QUERY_MAX_CHARS
    }
}

/// The view whose rows are searched and returned.
///
/// The names `score` and `ngram_text` are reserved. A view column called
/// `ngram_text` is returned in [`SearchHit::values`](super::SearchHit)
/// unchanged, but a view column called `score` shadows the computed score
/// in the threshold and ordering clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityView {
    /// Table or view name joined against the relation table
    pub name: String,
    /// Column matched against `fts_task_id`
    pub id_column: String,
    /// Integer column; rows where it is non-zero are never returned
    pub deleted_column: String,
}

impl Default for EntityView {
    fn default() -> Self {
        Self {
            name: tasks::VIEW.to_string(),
            id_column: tasks::ID.to_string(),
            deleted_column: tasks::DELETED.to_string(),
        }
    }
}

/// How a query is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPath {
    /// Overlap between query ngrams and indexed ngrams
    NGram,
    /// Indexed ngrams starting with the query text
    Prefix,
}

/// Compiled SQL with its bound arguments.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub sql: String,
    pub params: Vec<Value>,
    pub path: MatchPath,
}

/// Compile a request into SQL.
///
/// `tokens` is the tokenized query. Arguments are bound in placeholder
/// order: the token count, the filter arguments, then the tokens (or the
/// prefix pattern).
///
/// On the prefix path the pattern is built from the first token rather
/// than the raw query, so case and word separators are normalized the same
/// way as indexed text.
///
/// # Errors
///
/// `FtsError::EmptyQuery` if `tokens` is empty, since the token count is
/// the score denominator.
pub fn build_plan(
    view: &EntityView,
    request: &SearchRequest,
    tokens: &BTreeSet<String>,
) -> FtsResult<SearchPlan> {
    if tokens.is_empty() {
        return Err(FtsError::EmptyQuery);
    }

    let v = &view.name;
    let mut sql = format!(
        "SELECT {v}.*, FTS_Ngram.ngram_text AS {MATCHED_NGRAM_COLUMN}, \
         min(1.0 * count(DISTINCT FTS_Ngram.ngram_id) / ?, 1.0) AS {SCORE_COLUMN} \
         FROM FTS_Ngram \
         JOIN FTS_Content ON (FTS_Ngram.ngram_id = FTS_Content.fts_ngram_id) \
         JOIN {v} ON ({v}.{id} = FTS_Content.fts_task_id) \
         WHERE ",
        id = view.id_column,
    );

    let mut params: Vec<Value> = Vec::with_capacity(1 + request.filter_args.len() + tokens.len());
    params.push(Value::Integer(tokens.len() as i64));

    if let Some(filter) = request.filter.as_deref().filter(|f| !f.trim().is_empty()) {
        sql.push_str(&format!("({filter}) AND "));
        params.extend(request.filter_args.iter().cloned());
    }

    let short_token = tokens.iter().next().filter(|_| request.is_short());
    let path = if let Some(token) = short_token {
        sql.push_str("(FTS_Ngram.ngram_text LIKE ? ESCAPE '\\')");
        params.push(Value::Text(format!("{}%", escape_like(token))));
        MatchPath::Prefix
    } else {
        let placeholders = vec!["?"; tokens.len()].join(",");
        sql.push_str(&format!("(FTS_Ngram.ngram_text IN ({placeholders}))"));
        params.extend(tokens.iter().cloned().map(Value::Text));
        MatchPath::NGram
    };

    sql.push_str(&format!(
        " AND {v}.{deleted} = 0 GROUP BY {v}.{id} HAVING {SCORE_COLUMN} > {MIN_SCORE} \
         ORDER BY {SCORE_COLUMN} DESC",
        deleted = view.deleted_column,
        id = view.id_column,
    ));
    if let Some(sort) = request.sort_order.as_deref().filter(|s| !s.trim().is_empty()) {
        sql.push_str(", ");
        sql.push_str(sort);
    }

    Ok(SearchPlan { sql, params, path })
}

/// Escape LIKE wildcards so the text matches literally with `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
