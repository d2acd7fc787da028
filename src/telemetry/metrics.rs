//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

pub const DISPATCH_TOTAL: &str = "mailer_dispatch_total";
pub const PROVIDER_DURATION: &str = "mailer_provider_duration_seconds";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // SMTP round trips are slow compared to HTTP handlers, so the buckets
    // stretch out to the 60s invocation deadline.
    let buckets = vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines from startup.
pub fn describe_metrics() {
    describe_counter!(
        DISPATCH_TOTAL,
        "Callable invocations by operation and outcome"
    );
    describe_histogram!(
        PROVIDER_DURATION,
        "Time spent waiting on the mail provider in seconds"
    );

    for operation in ["send_verification_email", "test_send_email"] {
        counter!(DISPATCH_TOTAL, "operation" => operation, "result" => "success").absolute(0);
    }
}

/// Count one finished invocation
pub fn record_dispatch(operation: &'static str, result: &'static str) {
    counter!(DISPATCH_TOTAL, "operation" => operation, "result" => result).increment(1);
}

/// Record how long the provider call took
pub fn record_provider_duration(operation: &'static str, strategy: &'static str, elapsed: Duration) {
    histogram!(PROVIDER_DURATION, "operation" => operation, "strategy" => strategy)
        .record(elapsed.as_secs_f64());
}
