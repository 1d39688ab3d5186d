//! Logging and metrics setup

use crate::cli::LogFormat;
use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

pub const REQUESTS_TOTAL: &str = "veracity_requests_total";
pub const DECISIONS_TOTAL: &str = "veracity_decisions_total";
pub const ERRORS_TOTAL: &str = "veracity_errors_total";
pub const INFERENCE_LATENCY_US: &str = "veracity_inference_latency_us";

/// Initialize tracing/logging.
///
/// Logs go to stderr so `classify` output on stdout stays machine-readable.
pub fn init_tracing(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("veracity=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("veracity=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of classify requests");
    metrics::describe_counter!(DECISIONS_TOTAL, "Total number of decisions by label");
    metrics::describe_counter!(ERRORS_TOTAL, "Total number of errors by type");
    metrics::describe_histogram!(
        INFERENCE_LATENCY_US,
        metrics::Unit::Microseconds,
        "Text-to-decision latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
