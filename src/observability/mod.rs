//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Recording hooks and query surface produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber the host installs (stdout by default)
//!     → whatever metrics recorder the host installs (none by default)
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Metrics are cheap (no-op until a recorder is installed)

pub mod logging;
pub mod metrics;
