// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`],
// then every `Matcher::run` reports its latency and summary. This keeps
// instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::summary::RunSummary;

/// Metrics observer for matching runs.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of a run. `latency` covers deduplication, indexing,
    /// candidate generation and disambiguation.
    fn record_run(&self, latency: Duration, summary: &RunSummary);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
