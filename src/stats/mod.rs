//! Aggregated invocation statistics.
//!
//! # Data Flow
//! ```text
//! EventRecorder counters (snapshot under read lock)
//!     → aggregator.rs
//!         by thread: thread key → method → {count, total, avg}
//!         by method: method → {count, total, avg} summed over threads
//! ```
//!
//! # Design Decisions
//! - Pull-based and read-only; the recording path never calls in here
//! - Averages are computed at read time (integer milliseconds, 0 when count is 0)

pub mod aggregator;

pub use aggregator::{MethodStats, MethodStatsTable, StatsAggregator, ThreadStatsTable};
