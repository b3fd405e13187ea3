//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blog_http_requests_total` (counter): requests by method, status
//! - `blog_http_request_duration_seconds` (histogram): latency distribution
//! - `blog_db_operations_total` (counter): data access calls by operation, table, outcome
//! - `blog_slow_requests_total` (counter): requests over the slow threshold
//! - `blog_log_records_dropped_total` (counter): records lost to a full log queue
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The Prometheus exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    counter!(
        "blog_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("blog_http_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_db_operation(operation: &'static str, table: &'static str, ok: bool) {
    counter!(
        "blog_db_operations_total",
        "operation" => operation,
        "table" => table,
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

pub fn record_slow_request() {
    counter!("blog_slow_requests_total").increment(1);
}

pub fn record_dropped_log_record() {
    counter!("blog_log_records_dropped_total").increment(1);
}
