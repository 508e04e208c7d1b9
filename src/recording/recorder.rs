//! The event recorder: hook pair, event log, and counters.
//!
//! # Responsibilities
//! - Append START on entry and exactly one COMPLETE/ERROR on exit
//! - Maintain per-thread, per-method invocation counts and time totals
//! - Prune the log inline after terminal events when enabled
//! - Serve point-in-time snapshots to readers
//!
//! # Design Decisions
//! - Configuration is loaded from the shared handle on every call
//! - One `RwLock` guards log and counters together; poisoning is ignored
//!   so that a panicking invocation never disables monitoring

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::config::SharedConfig;
use crate::correlation::{CorrelationBinding, CorrelationContext, CorrelationId};
use crate::observability::metrics;
use crate::recording::clock::{Clock, SystemClock};
use crate::recording::counters::CounterTable;
use crate::recording::event::{Event, EventDetail, EventKind, InvocationId};
use crate::recording::pruning::{self, PruneReport};
use crate::recording::stack;
use crate::recording::thread::{ThreadInfo, ThreadKey};
use crate::telemetry::{ProcTelemetry, TelemetryProvider, TelemetrySnapshot};

/// How a monitored operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operation failed; carries the error message only.
    Failed(String),
}

/// State carried from `on_enter` to the matching `on_exit`.
#[derive(Debug)]
#[must_use = "an entered invocation must be passed to on_exit"]
pub struct InvocationHandle {
    invocation: InvocationId,
    binding: CorrelationBinding,
    thread: ThreadInfo,
    thread_key: ThreadKey,
    method_name: String,
    started_at: Instant,
}

impl InvocationHandle {
    pub fn invocation(&self) -> InvocationId {
        self.invocation
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.binding.id
    }

    pub fn is_nested(&self) -> bool {
        self.binding.is_nested()
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Whole milliseconds since entry, from a monotonic clock.
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Default)]
struct RecorderState {
    log: VecDeque<Event>,
    counters: CounterTable,
    next_sequence: u64,
}

impl RecorderState {
    fn append(&mut self, mut event: Event) {
        event.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.log.push_back(event);
    }
}

/// Shared recorder for all monitored invocations of a process.
pub struct EventRecorder {
    config: SharedConfig,
    telemetry: Arc<dyn TelemetryProvider>,
    clock: Arc<dyn Clock>,
    state: RwLock<RecorderState>,
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("config", &self.config.load())
            .field("events", &self.len())
            .finish_non_exhaustive()
    }
}

impl EventRecorder {
    /// Recorder with procfs telemetry and the system clock.
    pub fn new(config: SharedConfig) -> Self {
        Self::with_parts(config, Arc::new(ProcTelemetry), Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: SharedConfig,
        telemetry: Arc<dyn TelemetryProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            telemetry,
            clock,
            state: RwLock::new(RecorderState::default()),
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RecorderState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RecorderState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry hook. Returns `None` when monitoring is disabled, in which case
    /// nothing is recorded and no correlation id is bound.
    pub fn on_enter(&self, method_name: impl Into<String>, thread: ThreadInfo) -> Option<InvocationHandle> {
        let config = self.config.load();
        if !config.enabled {
            return None;
        }

        let started_at = Instant::now();
        let timestamp_ms = self.clock.now_millis();
        let binding = CorrelationContext::enter();
        let method_name = method_name.into();
        let thread_key = thread.key();
        let invocation = InvocationId::next();
        let stack_trace = config
            .stack_trace_enabled
            .then(|| stack::capture(config.stack_trace_depth));

        let event = Event {
            sequence: 0,
            invocation,
            correlation_id: binding.id,
            thread_id: thread.id,
            thread_name: thread.name.clone(),
            method_name: method_name.clone(),
            timestamp_ms,
            detail: EventDetail::Start { stack_trace },
        };

        {
            let mut state = self.write_state();
            state.append(event);
            state.counters.record_invocation(&thread_key, &method_name);
        }
        metrics::record_event(EventKind::Start);

        tracing::trace!(
            invocation = %invocation,
            correlation_id = %binding.id,
            method = %method_name,
            nested = binding.is_nested(),
            "Invocation started"
        );

        Some(InvocationHandle {
            invocation,
            binding,
            thread,
            thread_key,
            method_name,
            started_at,
        })
    }

    /// Exit hook. Appends exactly one terminal event for `handle`.
    ///
    /// COMPLETE adds `execution_time_ms` to the time accumulator; ERROR
    /// leaves it untouched. The correlation binding is released afterwards
    /// if this invocation created it.
    pub fn on_exit(
        &self,
        handle: InvocationHandle,
        outcome: Outcome,
        execution_time_ms: u64,
        telemetry: Option<TelemetrySnapshot>,
    ) {
        let config = self.config.load();
        let timestamp_ms = self.clock.now_millis();

        let (kind, detail) = match outcome {
            Outcome::Completed => (
                EventKind::Complete,
                EventDetail::Complete {
                    execution_time_ms,
                    telemetry,
                },
            ),
            Outcome::Failed(description) => (EventKind::Error, EventDetail::Error { description }),
        };

        let event = Event {
            sequence: 0,
            invocation: handle.invocation,
            correlation_id: handle.binding.id,
            thread_id: handle.thread.id,
            thread_name: handle.thread.name,
            method_name: handle.method_name,
            timestamp_ms,
            detail,
        };

        let pruned = {
            let mut state = self.write_state();
            if kind == EventKind::Complete {
                state
                    .counters
                    .add_time(&handle.thread_key, &event.method_name, execution_time_ms);
            }
            state.append(event);

            config.log_pruning_enabled.then(|| {
                pruning::prune(
                    &mut state.log,
                    config.max_event_log_size,
                    pruning::age_cutoff(timestamp_ms, config.max_event_log_age_hours),
                )
            })
        };
        metrics::record_event(kind);
        if let Some(report) = pruned {
            log_prune(&report);
        }

        if handle.binding.owns_binding() {
            if CorrelationContext::current() == Some(handle.binding.id) {
                CorrelationContext::release();
            } else {
                tracing::warn!(
                    invocation = %handle.invocation,
                    correlation_id = %handle.binding.id,
                    "Invocation exited outside its correlation context; binding left in place"
                );
            }
        }
    }

    /// Measure, capture telemetry, and call `on_exit`.
    pub fn finish(&self, handle: InvocationHandle, outcome: Outcome) {
        let execution_time_ms = handle.elapsed_ms();
        let telemetry = match outcome {
            Outcome::Completed => TelemetrySnapshot::capture(self.telemetry.as_ref()),
            Outcome::Failed(_) => None,
        };
        self.on_exit(handle, outcome, execution_time_ms, telemetry);
    }

    /// Apply the configured pruning policy now.
    pub fn prune(&self) -> PruneReport {
        let config = self.config.load();
        let cutoff = pruning::age_cutoff(self.clock.now_millis(), config.max_event_log_age_hours);
        let report = {
            let mut state = self.write_state();
            pruning::prune(&mut state.log, config.max_event_log_size, cutoff)
        };
        log_prune(&report);
        report
    }

    /// Clear the log and all counters in one step.
    pub fn reset(&self) {
        let removed = {
            let mut state = self.write_state();
            let removed = state.log.len();
            state.log.clear();
            state.counters.clear();
            removed
        };
        metrics::record_reset();
        tracing::info!(removed_events = removed, "Monitoring statistics reset");
    }

    /// Copy of the whole log in append order.
    pub fn events(&self) -> Vec<Event> {
        self.read_state().log.iter().cloned().collect()
    }

    /// The oldest `limit` events.
    pub fn first_events(&self, limit: usize) -> Vec<Event> {
        self.read_state().log.iter().take(limit).cloned().collect()
    }

    /// Events whose timestamp lies in `[start_ms, end_ms]`.
    pub fn events_between(&self, start_ms: u64, end_ms: u64) -> Vec<Event> {
        self.read_state()
            .log
            .iter()
            .filter(|event| (start_ms..=end_ms).contains(&event.timestamp_ms))
            .cloned()
            .collect()
    }

    /// Copy of the counter table.
    pub fn counters(&self) -> CounterTable {
        self.read_state().counters.clone()
    }

    pub fn len(&self) -> usize {
        self.read_state().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn log_prune(report: &PruneReport) {
    metrics::record_pruned(report.removed);
    if report.removed > 0 {
        tracing::debug!(
            policy = ?report.policy,
            removed = report.removed,
            remaining = report.remaining,
            "Event log pruned"
        );
    }
}
