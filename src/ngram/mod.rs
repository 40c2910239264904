//! Tokenization into n-grams.
//!
//! The same tokenizer must be used when indexing and when querying,
//! otherwise the match ratio computed by the search engine is meaningless.

mod generator;

pub use generator::{NGramGenerator, DEFAULT_GRAM_LENGTH, DEFAULT_MIN_WORD_LENGTH};

use std::collections::BTreeSet;

/// Converts text into a set of unique tokens.
///
/// Implementations must be stateless so a single value can be shared by
/// the indexer and the search engine.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`. Empty input yields an empty set.
    fn tokenize(&self, text: &str) -> BTreeSet<String>;
}
