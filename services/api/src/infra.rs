use job_portal::persistence::SqliteStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-level state for the operational routes.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<SqliteStore>,
}

impl AppState {
    /// Ready once the listener is bound and the database answers.
    pub(crate) fn is_ready(&self) -> bool {
        self.readiness.load(Ordering::Acquire) && self.store.ping().is_ok()
    }
}
