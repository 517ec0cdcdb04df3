pub mod handlers;
pub mod request_id;
pub mod server;

use std::sync::Arc;

use pkg_capabilities::ResourceLookup;
use pkg_metrics::MetricsRegistry;

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn ResourceLookup>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(lookup: Arc<dyn ResourceLookup>) -> Self {
        Self {
            lookup,
            metrics: Arc::new(MetricsRegistry::with_admission_counters()),
        }
    }
}
