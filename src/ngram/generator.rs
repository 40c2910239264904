//! Character n-gram generation.

use super::Tokenizer;
use crate::error::{FtsError, FtsResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Gram length used by the task index.
pub const DEFAULT_GRAM_LENGTH: usize = 3;

/// Minimum word length (in characters) used by the task index.
pub const DEFAULT_MIN_WORD_LENGTH: usize = 1;

/// Anything that is not a letter, combining mark or digit separates words.
static WORD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\d]+").expect("Failed to compile word separator regex"));

/// Splits text into lowercase words and emits every `n`-character window of
/// each word.
///
/// Words shorter than `n` characters are emitted whole, so a query like
/// "to" still produces the token "to". Words shorter than the minimum word
/// length are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGramGenerator {
    n: usize,
    min_word_len: usize,
}

impl NGramGenerator {
    /// Create a generator for grams of length `n`.
    ///
    /// # Errors
    ///
    /// Returns `FtsError::InvalidArgument` if either parameter is zero.
    pub fn new(n: usize, min_word_len: usize) -> FtsResult<Self> {
        if n == 0 {
            return Err(FtsError::InvalidArgument(
                "gram length must be at least 1".to_string(),
            ));
        }
        if min_word_len == 0 {
            return Err(FtsError::InvalidArgument(
                "minimum word length must be at least 1".to_string(),
            ));
        }
        Ok(Self { n, min_word_len })
    }

    fn add_word_grams(&self, word: &str, grams: &mut BTreeSet<String>) {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < self.min_word_len {
            return;
        }
        if chars.len() <= self.n {
            grams.insert(word.to_string());
            return;
        }
        for window in chars.windows(self.n) {
            grams.insert(window.iter().collect());
        }
    }
}

impl Default for NGramGenerator {
    fn default() -> Self {
        Self {
            n: DEFAULT_GRAM_LENGTH,
            min_word_len: DEFAULT_MIN_WORD_LENGTH,
        }
    }
}

impl Tokenizer for NGramGenerator {
    fn tokenize(&self, text: &str) -> BTreeSet<String> {
        let mut grams = BTreeSet::new();
        let lower = text.to_lowercase();
        for word in WORD_SEPARATOR.split(&lower) {
            if !word.is_empty() {
                self.add_word_grams(word, &mut grams);
            }
        }
        grams
    }
}
