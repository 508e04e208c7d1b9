//! The transaction monitor: hook entry points and the query surface.
//!
//! One `TransactionMonitor` owns a recorder and the live configuration.
//! Clones share both, so a monitor can be handed to every worker.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use crate::config::{MonitorConfig, MonitoringConfig, SharedConfig};
use crate::correlation::CorrelationContext;
use crate::presentation::{self, TimelinePresenter};
use crate::recording::pruning::PruneReport;
use crate::recording::{method_name, Clock, Event, EventRecorder, InvocationGuard, ThreadInfo};
use crate::stats::{MethodStatsTable, StatsAggregator, ThreadStatsTable};
use crate::telemetry::TelemetryProvider;

#[derive(Debug, Clone)]
pub struct TransactionMonitor {
    config: SharedConfig,
    recorder: Arc<EventRecorder>,
}

impl TransactionMonitor {
    pub fn new(config: SharedConfig) -> Self {
        let recorder = Arc::new(EventRecorder::new(config.clone()));
        Self { config, recorder }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.shared())
    }

    /// Monitor with a custom telemetry source and clock.
    pub fn with_parts(
        config: SharedConfig,
        telemetry: Arc<dyn TelemetryProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let recorder = Arc::new(EventRecorder::with_parts(config.clone(), telemetry, clock));
        Self { config, recorder }
    }

    /// Live configuration handle. Stores into it take effect on the next call.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn recorder(&self) -> &Arc<EventRecorder> {
        &self.recorder
    }

    pub fn enable(&self) {
        self.set_enabled(true);
    }

    /// Stop recording new invocations. In-flight ones still exit normally.
    pub fn disable(&self) {
        self.set_enabled(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.config.load().enabled
    }

    fn set_enabled(&self, enabled: bool) {
        self.config.rcu(|current| MonitoringConfig {
            enabled,
            ..MonitoringConfig::clone(current)
        });
        tracing::info!(enabled, "Monitoring toggled");
    }

    /// Record entry into `declaring_type.method` on the calling thread.
    pub fn enter(&self, declaring_type: &str, method: &str) -> InvocationGuard {
        let name = method_name::shorten(declaring_type, method);
        let handle = self.recorder.on_enter(name, ThreadInfo::current());
        InvocationGuard::new(self.recorder.clone(), handle)
    }

    /// Run `operation` as a monitored invocation and return its result as is.
    pub fn invoke<T, E, F>(&self, declaring_type: &str, method: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let guard = self.enter(declaring_type, method);
        guard.finish(operation())
    }

    /// Async counterpart of [`invoke`](Self::invoke).
    ///
    /// Opens a task-local correlation scope unless one is already active, so
    /// the binding follows the future across worker threads. A new scope is
    /// seeded with the caller's id, so a call made under an open invocation
    /// joins its chain.
    pub async fn invoke_async<T, E, F>(&self, declaring_type: &str, method: &str, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let run = async {
            let guard = self.enter(declaring_type, method);
            guard.finish(operation.await)
        };
        if CorrelationContext::in_task_scope() {
            run.await
        } else {
            CorrelationContext::inherit(run).await
        }
    }

    /// The whole log in append order.
    pub fn get_all_events(&self) -> Vec<Event> {
        self.recorder.events()
    }

    /// The first `limit` events in append order.
    pub fn get_events(&self, limit: usize) -> Vec<Event> {
        self.recorder.first_events(limit)
    }

    /// Events with `start_ms <= timestamp <= end_ms`.
    pub fn get_events_in_time_range(&self, start_ms: u64, end_ms: u64) -> Vec<Event> {
        self.recorder.events_between(start_ms, end_ms)
    }

    pub fn stats_by_thread(&self) -> ThreadStatsTable {
        StatsAggregator::snapshot(&self.recorder).by_thread()
    }

    pub fn stats_by_method(&self) -> MethodStatsTable {
        StatsAggregator::snapshot(&self.recorder).by_method()
    }

    /// Clear the event log and every counter.
    pub fn reset_stats(&self) {
        self.recorder.reset();
    }

    pub fn prune_event_log(&self) -> PruneReport {
        self.recorder.prune()
    }

    pub fn render_verbose_timeline(&self) -> String {
        TimelinePresenter::verbose().render(&self.recorder.events())
    }

    pub fn render_condensed_timeline(&self) -> String {
        TimelinePresenter::condensed().render(&self.recorder.events())
    }

    pub fn render_stats_by_thread(&self) -> String {
        presentation::render_stats_by_thread(&self.stats_by_thread())
    }

    pub fn render_stats_by_method(&self) -> String {
        presentation::render_stats_by_method(&self.stats_by_method())
    }
}

impl Default for TransactionMonitor {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}
