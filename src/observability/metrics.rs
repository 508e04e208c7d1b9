//! Internal counters.
//!
//! # Metrics
//! - `txn_monitor_events_total` (counter): appended events by kind
//! - `txn_monitor_pruned_events_total` (counter): events dropped by pruning
//! - `txn_monitor_resets_total` (counter): full resets

use crate::recording::event::EventKind;

pub fn record_event(kind: EventKind) {
    metrics::counter!("txn_monitor_events_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_pruned(removed: usize) {
    if removed > 0 {
        metrics::counter!("txn_monitor_pruned_events_total").increment(removed as u64);
    }
}

pub fn record_reset() {
    metrics::counter!("txn_monitor_resets_total").increment(1);
}
