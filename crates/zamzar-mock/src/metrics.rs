//! Prometheus metrics for the mock server.
//!
//! Tracks request outcomes, lifecycle transitions and list pages served.
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

lazy_static! {
    /// Total number of requests processed
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "zamzar_mock_requests_total",
        "Total number of requests processed by the mock",
        &["method", "status"]
    )
    .unwrap();

    /// Lifecycle phase changes
    pub static ref LIFECYCLE_TRANSITIONS_TOTAL: CounterVec = register_counter_vec!(
        "zamzar_mock_lifecycle_transitions_total",
        "Total number of lifecycle phase changes",
        &["resource", "from", "to"]
    )
    .unwrap();

    /// List pages built
    pub static ref INDEX_PAGES_TOTAL: CounterVec = register_counter_vec!(
        "zamzar_mock_index_pages_total",
        "Total number of list pages served",
        &["resource"]
    )
    .unwrap();
}

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Helper to record request processing
pub fn record_request(method: &str, status: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
}

/// Helper to record a lifecycle phase change
pub fn record_transition(resource: &str, from: &str, to: &str) {
    LIFECYCLE_TRANSITIONS_TOTAL
        .with_label_values(&[resource, from, to])
        .inc();
}

/// Helper to record a list page
pub fn record_index_page(index: &str) {
    INDEX_PAGES_TOTAL.with_label_values(&[index]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request() {
        let before = REQUESTS_TOTAL.with_label_values(&["GET", "418"]).get();
        record_request("GET", 418);
        let after = REQUESTS_TOTAL.with_label_values(&["GET", "418"]).get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_collect_metrics_contains_registered_families() {
        record_transition("widgets", "started", "processing");
        record_index_page("widgets");
        let text = collect_metrics();
        assert!(text.contains("zamzar_mock_lifecycle_transitions_total"));
        assert!(text.contains("zamzar_mock_index_pages_total"));
    }
}
