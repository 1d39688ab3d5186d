//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use veracity_classifiers::FakeNewsDetector;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded detector, shared read-only
    pub detector: Arc<FakeNewsDetector>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(detector: Arc<FakeNewsDetector>, metrics_handle: PrometheusHandle) -> Self {
        Self {
            detector,
            metrics_handle,
        }
    }
}
