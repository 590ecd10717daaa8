// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the catalog index.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter.
//!
//! # Metric Naming Convention
//! - `catalog_index_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: build, commit, search, translate
//! - `status`: success, error

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "catalog_index_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a document built from a record
pub fn record_document_built(kind: &str) {
    counter!(
        "catalog_index_documents_built_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a bounding box dropped during document construction
pub fn record_bbox_rejected() {
    counter!("catalog_index_bbox_rejected_total").increment(1);
}

/// Record a commit and how many documents it touched
pub fn record_commit(touched: usize) {
    counter!("catalog_index_commits_total").increment(1);
    histogram!("catalog_index_commit_documents").record(touched as f64);
}

/// Record a commit the store rejected; the previous snapshot stays live
pub fn record_commit_failed() {
    counter!("catalog_index_commit_failures_total").increment(1);
}

/// Set current document count
pub fn set_index_documents(count: usize) {
    gauge!("catalog_index_documents").set(count as f64);
}

/// Record a search execution
pub fn record_search(status: &str) {
    counter!(
        "catalog_index_searches_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record search latency by result source (index, cache, identifier)
pub fn record_search_latency(source: &str, duration: Duration) {
    histogram!(
        "catalog_index_search_seconds",
        "source" => source.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record search result count
pub fn record_search_results(count: usize) {
    histogram!("catalog_index_search_results").record(count as f64);
}

/// Record search cache hit/miss
pub fn record_search_cache(hit: bool) {
    counter!(
        "catalog_index_search_cache_total",
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

/// Set search cache stats gauge
pub fn set_search_cache_stats(entries: usize, hit_rate: f64) {
    gauge!("catalog_index_search_cache_entries").set(entries as f64);
    gauge!("catalog_index_search_cache_hit_rate").set(hit_rate);
}

/// Record a filter that could not be translated
pub fn record_translate_error(reason: &str) {
    counter!(
        "catalog_index_translate_errors_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a spatial predicate that failed to evaluate against a document
pub fn record_spatial_error() {
    counter!("catalog_index_spatial_errors_total").increment(1);
}

/// Set engine state (as numeric value for alerting)
pub fn set_engine_state(state: &str) {
    let value = match state {
        "Created" => 0.0,
        "Open" => 1.0,
        "Rebuilding" => 2.0,
        "Closed" => 3.0,
        _ => -1.0,
    };
    gauge!("catalog_index_state").set(value);
}

/// Timer guard that records latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}
