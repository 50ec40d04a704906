//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the jobscout server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - SSE delivery metrics
//! - Store gauges (collected dynamically)
//!
//! Domain metrics (runs, searches, ingestion, matching, oracle calls)
//! live in the core crate and are registered here alongside.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "jobscout_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("jobscout_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "jobscout_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// SSE Metrics
// =============================================================================

/// Progress events delivered over SSE, by event name.
pub static SSE_EVENTS_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "jobscout_sse_events_sent_total",
            "Progress events delivered over SSE",
        ),
        &["type"],
    )
    .unwrap()
});

/// Active SSE run streams.
pub static SSE_STREAMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "jobscout_sse_streams_active",
        "Number of run progress streams currently open",
    )
    .unwrap()
});

// =============================================================================
// Store Gauges (collected dynamically)
// =============================================================================

/// Active postings in the store.
pub static POSTINGS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "jobscout_postings_active",
        "Number of active postings in the store",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // SSE
    registry
        .register(Box::new(SSE_EVENTS_SENT.clone()))
        .unwrap();
    registry
        .register(Box::new(SSE_STREAMS_ACTIVE.clone()))
        .unwrap();

    // Stores
    registry
        .register(Box::new(POSTINGS_ACTIVE.clone()))
        .unwrap();

    // Core metrics (runs, discovery, search, ingestion, matching)
    for metric in jobscout_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect current store contents.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let filter = jobscout_core::PostingFilter::new();
    if let Ok(count) = state.postings().count(&filter) {
        POSTINGS_ACTIVE.set(count);
    }
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    let uuid_regex = regex_lite::Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .unwrap();
    let numeric_regex = regex_lite::Regex::new(r"/\d+(/|$)").unwrap();

    let result = uuid_regex.replace_all(path, "{id}");
    let result = numeric_regex.replace_all(&result, "/{id}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/v1/profiles/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_path(path), "/api/v1/profiles/{id}");
    }

    #[test]
    fn test_normalize_path_uuid_middle() {
        let path = "/api/v1/profiles/550e8400-e29b-41d4-a716-446655440000/matches";
        assert_eq!(normalize_path(path), "/api/v1/profiles/{id}/matches");
    }

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/postings/12345";
        assert_eq!(normalize_path(path), "/api/v1/postings/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        let path = "/api/v1/health";
        assert_eq!(normalize_path(path), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("jobscout_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_http_and_sse_metrics() {
        // Prometheus only outputs metrics that have been touched.
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        SSE_EVENTS_SENT.with_label_values(&["complete"]).inc();
        SSE_STREAMS_ACTIVE.set(0);
        POSTINGS_ACTIVE.set(0);

        let output = encode_metrics();
        assert!(output.contains("jobscout_http_request_duration_seconds"));
        assert!(output.contains("jobscout_http_requests_in_flight"));
        assert!(output.contains("jobscout_sse_events_sent_total"));
        assert!(output.contains("jobscout_sse_streams_active"));
        assert!(output.contains("jobscout_postings_active"));
    }
}
