//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Research runs (lifecycle, durations, outcomes)
//! - Discovery oracle and job-board sources
//! - Posting ingestion and match scoring

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Run Metrics
// =============================================================================

/// Research runs total by outcome.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobscout_runs_total", "Total research runs"),
        &["outcome"], // "completed", "cancelled", "failed"
    )
    .unwrap()
});

/// Run duration in seconds.
pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("jobscout_run_duration_seconds", "Duration of research runs")
            .buckets(vec![1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["outcome"],
    )
    .unwrap()
});

/// Companies proposed per run.
pub static COMPANIES_DISCOVERED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jobscout_companies_discovered",
            "Number of employer candidates per run",
        )
        .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 10.0, 15.0]),
        &[],
    )
    .unwrap()
});

/// Employer searches total by status.
pub static EMPLOYER_SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "jobscout_employer_searches_total",
            "Total per-employer searches",
        ),
        &["status"], // "done", "error"
    )
    .unwrap()
});

/// Employer search duration in seconds.
pub static EMPLOYER_SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jobscout_employer_search_duration_seconds",
            "Duration of one employer's search",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Postings seen by the ingestor, by outcome.
pub static POSTINGS_INGESTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobscout_postings_ingested_total", "Total postings ingested"),
        &["outcome"], // "new", "duplicate", "invalid"
    )
    .unwrap()
});

/// New postings found per employer search.
pub static NEW_POSTINGS_PER_EMPLOYER: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jobscout_new_postings_per_employer",
            "New postings persisted per employer search",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0, 15.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Matching Metrics
// =============================================================================

/// Match recomputations total.
pub static MATCH_RECOMPUTATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "jobscout_match_recomputations_total",
        "Total profile match recomputations",
    )
    .unwrap()
});

/// Distribution of computed match scores.
pub static MATCH_SCORES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("jobscout_match_scores", "Distribution of match scores")
            .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jobscout_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "jobscout_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Oracle tokens used.
pub static ORACLE_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobscout_oracle_tokens_total", "Total oracle tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Runs
        Box::new(RUNS_TOTAL.clone()),
        Box::new(RUN_DURATION.clone()),
        Box::new(COMPANIES_DISCOVERED.clone()),
        Box::new(EMPLOYER_SEARCHES.clone()),
        Box::new(EMPLOYER_SEARCH_DURATION.clone()),
        // Ingestion
        Box::new(POSTINGS_INGESTED.clone()),
        Box::new(NEW_POSTINGS_PER_EMPLOYER.clone()),
        // Matching
        Box::new(MATCH_RECOMPUTATIONS.clone()),
        Box::new(MATCH_SCORES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        Box::new(ORACLE_TOKENS.clone()),
    ]
}
