//! Fuzzy substring search over the n-gram index.
//!
//! Queries longer than two characters are tokenized and every entity is
//! scored by `min(matched distinct ngrams / query ngrams, 1.0)`; only
//! entities scoring above 0.3 are returned. Shorter queries match indexed
//! ngrams by prefix instead.

mod engine;
mod hit;
mod query;

pub use engine::SearchEngine;
pub use hit::SearchHit;
pub use query::{
    build_plan, EntityView, MatchPath, SearchPlan, SearchRequest, MATCHED_NGRAM_COLUMN, MIN_SCORE,
    SHORT_QUERY_MAX_CHARS,
};
