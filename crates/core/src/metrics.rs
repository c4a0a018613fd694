//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Cache gateway (hits, misses, errors)
//! - Indexer fan-out and content resolution
//! - End-to-end resolution latency and output size

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("godon_cache_lookups_total", "Total stream cache lookups"),
        &["result"], // "hit", "empty", "miss", "error"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// Indexer queries by result.
pub static INDEXER_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("godon_indexer_queries_total", "Total indexer queries"),
        &["result"], // "ok", "error", "timeout"
    )
    .unwrap()
});

/// Torrent file listings by source kind and result.
pub static CONTENT_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "godon_content_resolutions_total",
            "Total torrent content resolutions",
        ),
        &["source", "result"], // source: "magnet", "torrent"
    )
    .unwrap()
});

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// End-to-end resolution duration in seconds.
pub static RESOLVE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "godon_resolve_duration_seconds",
            "Duration of a stream resolution",
        )
        .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["outcome"], // "cached", "resolved", "empty"
    )
    .unwrap()
});

/// Streams returned per resolution.
pub static STREAMS_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "godon_streams_returned",
            "Number of streams returned per resolution",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
        &["media_type"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
        // External services
        Box::new(INDEXER_QUERIES.clone()),
        Box::new(CONTENT_RESOLUTIONS.clone()),
        // Pipeline
        Box::new(RESOLVE_DURATION.clone()),
        Box::new(STREAMS_RETURNED.clone()),
    ]
}
