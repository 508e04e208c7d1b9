//! Transaction monitoring engine.
//!
//! Records entry and exit of monitored operations as an ordered event log,
//! correlates nested invocations, aggregates per-thread and per-method
//! statistics, and renders the log as an indented timeline.
//!
//! # Architecture Overview
//!
//! ```text
//!   monitored call                          TransactionMonitor
//!   ──────────────▶ enter() ──▶ InvocationGuard ──▶ complete()/fail()/drop
//!                      │                                  │
//!                      ▼                                  ▼
//!              ┌──────────────┐   START     ┌─────────────────────────┐
//!              │ correlation  │────────────▶│       recording         │
//!              │ (task/thread │             │ event log + counters    │
//!              │   binding)   │◀────────────│ inline pruning          │
//!              └──────────────┘  release    └───────────┬─────────────┘
//!                                 COMPLETE/ERROR        │ snapshots
//!                   ┌───────────┐                       ▼
//!                   │ telemetry │──────▶ COMPLETE   ┌────────┐  ┌──────────────┐
//!                   └───────────┘                   │ stats  │─▶│ presentation │
//!                                                   └────────┘  └──────────────┘
//!
//!   Cross-cutting: config (TOML, validation, hot reload), observability
//! ```

pub mod config;
pub mod correlation;
pub mod monitor;
pub mod observability;
pub mod presentation;
pub mod recording;
pub mod stats;
pub mod telemetry;

pub use config::MonitorConfig;
pub use correlation::{CorrelationContext, CorrelationId};
pub use monitor::TransactionMonitor;
pub use presentation::{TimelineMode, TimelinePresenter};
pub use recording::{Event, EventKind, EventRecorder, InvocationGuard};
pub use stats::{MethodStats, StatsAggregator};
