//! Runtime resource telemetry attached to COMPLETE events.
//!
//! # Data Flow
//! ```text
//! invocation exit
//!     → provider.rs (TelemetryProvider: cpu/user time, allocations, loaded classes)
//!     → TelemetrySnapshot::capture (failures swallowed, fields omitted)
//!     → COMPLETE event
//! ```
//!
//! # Design Decisions
//! - Providers are pluggable; a missing capability reports `Unavailable`
//!   and the field is omitted, never defaulted
//! - Capture never fails or panics into the monitored operation

pub mod proc_stat;
pub mod provider;

pub use proc_stat::ProcTelemetry;
pub use provider::{FixedTelemetry, NoTelemetry, TelemetryError, TelemetryProvider, TelemetrySnapshot};
