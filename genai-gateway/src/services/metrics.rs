//! Prometheus metrics for the gateway.
//!
//! HTTP request metrics come from `service_core::middleware::metrics`; this
//! module adds generation outcomes and token usage.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one generation request by endpoint, model and outcome.
pub fn record_generation(endpoint: &'static str, model: &str, outcome: &'static str) {
    counter!(
        "genai_requests_total",
        "endpoint" => endpoint,
        "model" => model.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count tokens reported by the upstream for a completed text request.
pub fn record_tokens(model: &str, tokens: u32) {
    counter!("genai_tokens_total", "model" => model.to_string()).increment(u64::from(tokens));
}
