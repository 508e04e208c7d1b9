//! Event recording subsystem.
//!
//! # Data Flow
//! ```text
//! call site
//!     → guard.rs (InvocationGuard: enter now, exactly one exit later)
//!     → recorder.rs on_enter (START event + invocation counter)
//!     → monitored operation runs
//!     → recorder.rs on_exit (COMPLETE or ERROR event + time accumulator)
//!     → pruning.rs (inline, when enabled)
//!
//! Readers (stats, presentation, query surface):
//!     → recorder.rs snapshots (log and counters cloned under one read lock)
//! ```
//!
//! # Design Decisions
//! - Log and counters live behind one lock so reset and reads are never torn
//! - The enabled flag is read once at entry; in-flight invocations always exit
//! - Recording is infallible and never touches the monitored operation's result

pub mod clock;
pub mod counters;
pub mod event;
pub mod guard;
pub mod method_name;
pub mod pruning;
pub mod recorder;
pub mod stack;
pub mod thread;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counters::{CounterTable, ThreadMethodCounter};
pub use event::{Event, EventDetail, EventKind, InvocationId};
pub use guard::InvocationGuard;
pub use recorder::{EventRecorder, InvocationHandle, Outcome};
pub use thread::{ThreadInfo, ThreadKey};
