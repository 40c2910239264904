//! Counters for indexing and search activity.
//!
//! A single `FtsMetrics` value is cloned into the indexer and the search
//! engine; clones share the same counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for the n-gram index.
#[derive(Debug, Clone, Default)]
pub struct FtsMetrics {
    /// New rows written to the ngram table
    ngrams_inserted_total: Arc<AtomicU64>,

    /// Upserts that hit an existing ngram and resolved it by lookup
    ngram_conflicts_total: Arc<AtomicU64>,

    /// Relation rows written (duplicates ignored by the store are not counted)
    relations_written_total: Arc<AtomicU64>,

    /// Relation rows removed by re-indexing or cascade cleanup
    relations_removed_total: Arc<AtomicU64>,

    /// Non-empty fields tokenized and indexed
    fields_indexed_total: Arc<AtomicU64>,

    /// Search queries executed
    searches_total: Arc<AtomicU64>,

    /// Search queries answered through the short-query prefix path
    fallback_searches_total: Arc<AtomicU64>,

    /// Total duration of all searches in microseconds
    search_duration_total_us: Arc<AtomicU64>,
}

impl FtsMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly inserted ngram.
    pub fn record_ngram_inserted(&self) {
        self.ngrams_inserted_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an ngram upsert that resolved to an existing row.
    pub fn record_ngram_conflict(&self) {
        self.ngram_conflicts_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record relation rows written.
    pub fn record_relations_written(&self, count: usize) {
        self.relations_written_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record relation rows removed.
    pub fn record_relations_removed(&self, count: usize) {
        self.relations_removed_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record an indexed field.
    pub fn record_field_indexed(&self) {
        self.fields_indexed_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed search with its duration.
    pub fn record_search(&self, duration: Duration, fallback: bool) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
        if fallback {
            self.fallback_searches_total.fetch_add(1, Ordering::Relaxed);
        }
        self.search_duration_total_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn ngrams_inserted_total(&self) -> u64 {
        self.ngrams_inserted_total.load(Ordering::Relaxed)
    }

    pub fn ngram_conflicts_total(&self) -> u64 {
        self.ngram_conflicts_total.load(Ordering::Relaxed)
    }

    pub fn relations_written_total(&self) -> u64 {
        self.relations_written_total.load(Ordering::Relaxed)
    }

    pub fn relations_removed_total(&self) -> u64 {
        self.relations_removed_total.load(Ordering::Relaxed)
    }

    pub fn fields_indexed_total(&self) -> u64 {
        self.fields_indexed_total.load(Ordering::Relaxed)
    }

    pub fn searches_total(&self) -> u64 {
        self.searches_total.load(Ordering::Relaxed)
    }

    pub fn fallback_searches_total(&self) -> u64 {
        self.fallback_searches_total.load(Ordering::Relaxed)
    }

    /// Get average search duration in microseconds.
    pub fn search_duration_avg_us(&self) -> f64 {
        let total = self.search_duration_total_us.load(Ordering::Relaxed);
        let count = self.searches_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ngrams_inserted_total: self.ngrams_inserted_total(),
            ngram_conflicts_total: self.ngram_conflicts_total(),
            relations_written_total: self.relations_written_total(),
            relations_removed_total: self.relations_removed_total(),
            fields_indexed_total: self.fields_indexed_total(),
            searches_total: self.searches_total(),
            fallback_searches_total: self.fallback_searches_total(),
            search_duration_avg_us: self.search_duration_avg_us(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub ngrams_inserted_total: u64,
    pub ngram_conflicts_total: u64,
    pub relations_written_total: u64,
    pub relations_removed_total: u64,
    pub fields_indexed_total: u64,
    pub searches_total: u64,
    pub fallback_searches_total: u64,
    pub search_duration_avg_us: f64,
}

/// Helper for timing a search.
pub struct SearchTimer {
    start: Instant,
    metrics: FtsMetrics,
}

impl SearchTimer {
    /// Start timing a search.
    pub fn new(metrics: FtsMetrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the search.
    pub fn complete(self, fallback: bool) {
        let duration = self.start.elapsed();
        self.metrics.record_search(duration, fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = FtsMetrics::new();
        assert_eq!(metrics.ngrams_inserted_total(), 0);
        assert_eq!(metrics.searches_total(), 0);
        assert_eq!(metrics.search_duration_avg_us(), 0.0);
    }

    #[test]
    fn test_record_search() {
        let metrics = FtsMetrics::new();
        metrics.record_search(Duration::from_micros(100), false);
        metrics.record_search(Duration::from_micros(300), true);
        assert_eq!(metrics.searches_total(), 2);
        assert_eq!(metrics.fallback_searches_total(), 1);
        assert_eq!(metrics.search_duration_avg_us(), 200.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = FtsMetrics::new();
        let other = metrics.clone();
        other.record_relations_written(4);
        other.record_relations_removed(2);
        assert_eq!(metrics.relations_written_total(), 4);
        assert_eq!(metrics.relations_removed_total(), 2);
    }

    #[test]
    fn test_summary() {
        let metrics = FtsMetrics::new();
        metrics.record_ngram_inserted();
        metrics.record_ngram_conflict();
        metrics.record_field_indexed();

        let summary = metrics.summary();
        assert_eq!(summary.ngrams_inserted_total, 1);
        assert_eq!(summary.ngram_conflicts_total, 1);
        assert_eq!(summary.fields_indexed_total, 1);
        assert_eq!(summary.searches_total, 0);
    }

    #[test]
    fn test_search_timer() {
        let metrics = FtsMetrics::new();
        let timer = SearchTimer::new(metrics.clone());
        thread::sleep(Duration::from_millis(1));
        timer.complete(false);
        assert_eq!(metrics.searches_total(), 1);
        assert!(metrics.search_duration_avg_us() >= 1000.0);
    }

    #[test]
    fn test_concurrent_access() {
        let metrics = FtsMetrics::new();
        let metrics1 = metrics.clone();
        let metrics2 = metrics.clone();

        let handle1 = thread::spawn(move || {
            for _ in 0..100 {
                metrics1.record_ngram_inserted();
            }
        });
        let handle2 = thread::spawn(move || {
            for _ in 0..100 {
                metrics2.record_ngram_inserted();
            }
        });

        handle1.join().unwrap();
        handle2.join().unwrap();

        assert_eq!(metrics.ngrams_inserted_total(), 200);
    }
}
