//! Identity of the thread executing a monitored invocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Numeric id and name of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadInfo {
    pub id: u64,
    pub name: String,
}

impl ThreadInfo {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The calling thread. Ids are process-unique and never reused.
    pub fn current() -> Self {
        let id = THREAD_ID.with(|id| *id);
        let name = std::thread::current()
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("thread-{id}"));
        Self { id, name }
    }

    pub fn key(&self) -> ThreadKey {
        ThreadKey::new(&self.name, self.id)
    }
}

/// Counter key for a thread, rendered as `name;id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ThreadKey(String);

impl ThreadKey {
    pub fn new(name: &str, id: u64) -> Self {
        Self(format!("{name};{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Thread name part. Names may themselves contain `;`.
    pub fn name(&self) -> &str {
        self.0.rsplit_once(';').map_or(self.0.as_str(), |(name, _)| name)
    }

    /// Thread id part, as recorded.
    pub fn id(&self) -> &str {
        self.0.rsplit_once(';').map_or("", |(_, id)| id)
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
