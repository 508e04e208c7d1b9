//! Indented timeline of the event log.
//!
//! Events are ordered by timestamp, ties kept in append order. A depth
//! counter goes up on START and down after each terminal event; nested
//! entries are drawn with a `└>` marker under their parent.

use crate::recording::event::{Event, EventDetail, EventKind};
use crate::telemetry::TelemetrySnapshot;

use super::format::{format_bytes, format_millis, format_timestamp};

pub const TIMELINE_HEADER: &str = "=== Transaction Timeline ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineMode {
    Verbose,
    Condensed,
}

struct Labels {
    full_timestamp: bool,
    thread: &'static str,
    transaction: &'static str,
    method: &'static str,
    execution: &'static str,
    error: &'static str,
    cpu: &'static str,
    user: &'static str,
    allocated: &'static str,
    classes: &'static str,
    block_indent: usize,
}

const VERBOSE: Labels = Labels {
    full_timestamp: true,
    thread: "Thread",
    transaction: "Transaction",
    method: "Method",
    execution: "Execution time",
    error: "Exception",
    cpu: "CPU Time",
    user: "User Time",
    allocated: "Allocated Memory",
    classes: "Total Loaded Classes",
    block_indent: 39,
};

const CONDENSED: Labels = Labels {
    full_timestamp: false,
    thread: "Th",
    transaction: "Tr",
    method: "Me",
    execution: "Et",
    error: "Er",
    cpu: "CT",
    user: "UT",
    allocated: "AM",
    classes: "TLC",
    block_indent: 32,
};

/// Renders the event log as text.
#[derive(Debug, Clone, Copy)]
pub struct TimelinePresenter {
    mode: TimelineMode,
}

impl TimelinePresenter {
    pub fn new(mode: TimelineMode) -> Self {
        Self { mode }
    }

    pub fn verbose() -> Self {
        Self::new(TimelineMode::Verbose)
    }

    pub fn condensed() -> Self {
        Self::new(TimelineMode::Condensed)
    }

    fn labels(&self) -> &'static Labels {
        match self.mode {
            TimelineMode::Verbose => &VERBOSE,
            TimelineMode::Condensed => &CONDENSED,
        }
    }

    fn kind_label(&self, kind: EventKind) -> String {
        match self.mode {
            TimelineMode::Verbose => format!("{:<8}", kind.as_str()),
            TimelineMode::Condensed => kind.code().to_string(),
        }
    }

    /// Render a snapshot of the log. The input is not modified.
    pub fn render(&self, events: &[Event]) -> String {
        let labels = self.labels();
        let mut ordered: Vec<&Event> = events.iter().collect();
        ordered.sort_by_key(|event| (event.timestamp_ms, event.sequence));

        let mut out = String::from(TIMELINE_HEADER);
        let mut depth: usize = 0;

        for event in ordered {
            if event.kind() == EventKind::Start {
                depth += 1;
            }
            let (marker, continuation) = indentation(depth);

            out.push_str(&format!(
                "\n    [{}]{} {} | {}: {} (ID: {}) | {}: [{}] | {}: {}",
                format_timestamp(event.timestamp_ms, labels.full_timestamp),
                marker,
                self.kind_label(event.kind()),
                labels.thread,
                event.thread_name,
                event.thread_id,
                labels.transaction,
                event.correlation_id,
                labels.method,
                event.method_name,
            ));

            match &event.detail {
                EventDetail::Start { stack_trace } => {
                    if let Some(frames) = stack_trace {
                        out.push_str("\n    Stack trace:");
                        for frame in frames {
                            out.push_str("\n      ");
                            out.push_str(frame);
                        }
                    }
                }
                EventDetail::Complete {
                    execution_time_ms,
                    telemetry,
                } => {
                    out.push_str(&format!(" | {}: {} ms", labels.execution, execution_time_ms));
                    if let Some(info) = telemetry.as_ref().and_then(|t| telemetry_line(labels, t)) {
                        let pad = format!("\n{}{}", continuation, " ".repeat(labels.block_indent));
                        let rule = "-".repeat(info.chars().count());
                        for line in [&rule, &info, &rule] {
                            out.push_str(&pad);
                            out.push_str(line);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                EventDetail::Error { description } => {
                    out.push_str(&format!(" | {}: {}", labels.error, description));
                    depth = depth.saturating_sub(1);
                }
            }
        }

        out
    }
}

/// Marker before the event kind and prefix for continuation lines.
fn indentation(depth: usize) -> (String, String) {
    if depth > 1 {
        let width = (depth - 1) * 2;
        (format!("{}└>", " ".repeat(width + 1)), " ".repeat(width + 3))
    } else {
        (String::new(), String::new())
    }
}

fn telemetry_line(labels: &Labels, telemetry: &TelemetrySnapshot) -> Option<String> {
    let mut fields = Vec::with_capacity(4);
    if let Some(cpu) = telemetry.cpu_time {
        fields.push(format!("{}: {} ms", labels.cpu, format_millis(cpu)));
    }
    if let Some(user) = telemetry.user_time {
        fields.push(format!("{}: {} ms", labels.user, format_millis(user)));
    }
    if let Some(bytes) = telemetry.allocated_bytes {
        fields.push(format!("{}: {}", labels.allocated, format_bytes(bytes)));
    }
    if let Some(classes) = telemetry.loaded_class_count {
        fields.push(format!("{}: {}", labels.classes, classes));
    }

    (!fields.is_empty()).then(|| format!("| {} |", fields.join(" | ")))
}
