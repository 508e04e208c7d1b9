//! Human-readable rendering of the event log and statistics.
//!
//! # Data Flow
//! ```text
//! EventRecorder::events() (snapshot)
//!     → timeline.rs (stable sort by timestamp, depth-driven indentation)
//!         verbose:   full labels, full timestamp, telemetry block
//!         condensed: S/C/E codes, abbreviated labels
//!
//! StatsAggregator tables
//!     → stats_table.rs (aligned columns)
//! ```

pub mod format;
pub mod stats_table;
pub mod timeline;

pub use stats_table::{render_stats_by_method, render_stats_by_thread};
pub use timeline::{TimelineMode, TimelinePresenter};
