//! Prometheus metrics for the PIR service
//!
//! Privacy-safe metrics: only database and outcome labels, never query
//! content.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub const DB_SEGMENT: &str = "segment";
pub const DB_STREET: &str = "street";

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_ERROR: &str = "error";

pub fn record_request(db: &str, outcome: &str, duration: Duration) {
    counter!("pir_requests_total", "db" => db.to_string(), "outcome" => outcome.to_string())
        .increment(1);
    histogram!("pir_request_duration_seconds", "db" => db.to_string(), "outcome" => outcome.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_request_start(db: &str) {
    gauge!("pir_requests_in_flight", "db" => db.to_string()).increment(1.0);
}

pub fn record_request_end(db: &str) {
    gauge!("pir_requests_in_flight", "db" => db.to_string()).decrement(1.0);
}

pub fn set_database_ready(db: &str, ready: bool) {
    gauge!("pir_database_ready", "db" => db.to_string()).set(if ready { 1.0 } else { 0.0 });
}

pub fn record_preprocess(db: &str, duration: Duration) {
    histogram!("pir_preprocess_duration_seconds", "db" => db.to_string())
        .record(duration.as_secs_f64());
}

pub fn init_prometheus_recorder() -> metrics_exporter_prometheus::PrometheusHandle {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
