//! Bounding the event log.
//!
//! One policy per call, size first:
//! - log longer than `max_size` → drop the oldest `len - max_size` entries
//! - otherwise → drop entries older than `now - max_age`
//!
//! The policies never compose in a single call. An oversized log is only
//! trimmed to size, even if what remains is older than `max_age`.

use std::collections::VecDeque;

use crate::recording::event::Event;

const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Which rule a prune pass applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunePolicy {
    Size,
    Age,
}

/// Outcome of a prune pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub policy: PrunePolicy,
    pub removed: usize,
    pub remaining: usize,
}

/// Oldest timestamp kept by the age rule.
pub fn age_cutoff(now_ms: u64, max_age_hours: u64) -> u64 {
    now_ms.saturating_sub(max_age_hours.saturating_mul(MILLIS_PER_HOUR))
}

pub fn prune(log: &mut VecDeque<Event>, max_size: usize, cutoff_ms: u64) -> PruneReport {
    let before = log.len();

    let policy = if before > max_size {
        log.drain(..before - max_size);
        PrunePolicy::Size
    } else {
        log.retain(|event| event.timestamp_ms >= cutoff_ms);
        PrunePolicy::Age
    };

    PruneReport {
        policy,
        removed: before - log.len(),
        remaining: log.len(),
    }
}
