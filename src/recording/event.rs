//! Event log entries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::correlation::CorrelationId;
use crate::telemetry::TelemetrySnapshot;

static NEXT_INVOCATION: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one monitored invocation.
///
/// Nested invocations share a correlation id but never an invocation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InvocationId(u64);

impl InvocationId {
    pub fn next() -> Self {
        Self(NEXT_INVOCATION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Start,
    Complete,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "START",
            EventKind::Complete => "COMPLETE",
            EventKind::Error => "ERROR",
        }
    }

    /// Single-letter code used by the condensed timeline.
    pub fn code(&self) -> char {
        match self {
            EventKind::Start => 'S',
            EventKind::Complete => 'C',
            EventKind::Error => 'E',
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventKind::Start)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventDetail {
    Start {
        /// Caller frames, when stack capture is enabled.
        stack_trace: Option<Vec<String>>,
    },
    Complete {
        execution_time_ms: u64,
        telemetry: Option<TelemetrySnapshot>,
    },
    Error {
        description: String,
    },
}

/// One immutable entry of the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Append order, unique within a recorder.
    pub sequence: u64,
    pub invocation: InvocationId,
    pub correlation_id: CorrelationId,
    pub thread_id: u64,
    pub thread_name: String,
    pub method_name: String,
    /// Milliseconds since the epoch at which the event was produced.
    pub timestamp_ms: u64,
    pub detail: EventDetail,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self.detail {
            EventDetail::Start { .. } => EventKind::Start,
            EventDetail::Complete { .. } => EventKind::Complete,
            EventDetail::Error { .. } => EventKind::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    pub fn execution_time_ms(&self) -> Option<u64> {
        match self.detail {
            EventDetail::Complete { execution_time_ms, .. } => Some(execution_time_ms),
            _ => None,
        }
    }

    pub fn telemetry(&self) -> Option<&TelemetrySnapshot> {
        match &self.detail {
            EventDetail::Complete { telemetry, .. } => telemetry.as_ref(),
            _ => None,
        }
    }

    pub fn error_description(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Error { description } => Some(description),
            _ => None,
        }
    }

    pub fn stack_trace(&self) -> Option<&[String]> {
        match &self.detail {
            EventDetail::Start { stack_trace } => stack_trace.as_deref(),
            _ => None,
        }
    }
}
