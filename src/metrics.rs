//! Prometheus metrics for request, error and data-generation tracking.
//!
//! These mirror the in-memory counters reported by the backend so the same
//! numbers can be scraped. The exporter runs on its own listener, leaving the
//! service route tables untouched.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::Result;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP errors counter metric name.
pub const METRIC_HTTP_ERRORS: &str = "http_errors_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Generated data items counter metric name.
pub const METRIC_DATA_ITEMS_GENERATED: &str = "data_items_generated_total";
/// Generated data items flagged as errors metric name.
pub const METRIC_DATA_ITEMS_FAILED: &str = "data_items_failed_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests received");
    describe_counter!(
        METRIC_HTTP_ERRORS,
        "Total number of errors (unmatched routes and failed data items)"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request handling latency in milliseconds"
    );
    describe_counter!(
        METRIC_DATA_ITEMS_GENERATED,
        "Total number of demo data items generated"
    );
    describe_counter!(
        METRIC_DATA_ITEMS_FAILED,
        "Total number of demo data items generated with error status"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on `port`, if one is configured.
///
/// Must be called from within a tokio runtime.
pub fn install_exporter(port: Option<u16>) -> Result<()> {
    let Some(port) = port else {
        return Ok(());
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Prometheus exporter listening on {}", addr);

    Ok(())
}

/// Increment the request counter for a service.
pub fn inc_http_requests(service: &'static str) {
    counter!(METRIC_HTTP_REQUESTS, "service" => service).increment(1);
}

/// Add to the error counter for a service.
pub fn add_http_errors(service: &'static str, amount: u64) {
    if amount > 0 {
        counter!(METRIC_HTTP_ERRORS, "service" => service).increment(amount);
    }
}

/// Record a generated batch of data items.
pub fn record_data_batch(generated: u64, failed: u64) {
    counter!(METRIC_DATA_ITEMS_GENERATED).increment(generated);
    if failed > 0 {
        counter!(METRIC_DATA_ITEMS_FAILED).increment(failed);
    }
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, service: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "service" => service).record(latency_ms);
}
