//! Correlation of nested invocations.
//!
//! # Data Flow
//! ```text
//! Outermost monitored call on a thread/task:
//!     → context.rs binds a fresh CorrelationId (nested = false)
//! Calls nested inside it on the same logical context:
//!     → observe the existing binding (nested = true), reuse the id
//! Outermost call exits:
//!     → terminal event appended, then the binding is released
//! ```
//!
//! # Design Decisions
//! - Bindings are local to the calling thread, or to the tokio task when one
//!   was scoped with `CorrelationContext::scope`; never process-global
//! - Releasing an absent binding is a no-op

pub mod context;

pub use context::{CorrelationBinding, CorrelationContext, CorrelationId};
