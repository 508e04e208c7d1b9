//! Per-thread, per-method invocation counters.

use std::collections::BTreeMap;

use crate::recording::thread::ThreadKey;

/// Monotonic invocation count and cumulative execution time.
///
/// The average is derived by readers, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadMethodCounter {
    pub invocations: u64,
    pub total_time_ms: u64,
}

/// Counters keyed by thread, then by method name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterTable {
    threads: BTreeMap<ThreadKey, BTreeMap<String, ThreadMethodCounter>>,
}

impl CounterTable {
    fn entry(&mut self, thread: &ThreadKey, method: &str) -> &mut ThreadMethodCounter {
        self.threads
            .entry(thread.clone())
            .or_default()
            .entry(method.to_owned())
            .or_default()
    }

    pub fn record_invocation(&mut self, thread: &ThreadKey, method: &str) {
        let counter = self.entry(thread, method);
        counter.invocations = counter.invocations.saturating_add(1);
    }

    pub fn add_time(&mut self, thread: &ThreadKey, method: &str, elapsed_ms: u64) {
        let counter = self.entry(thread, method);
        counter.total_time_ms = counter.total_time_ms.saturating_add(elapsed_ms);
    }

    pub fn get(&self, thread: &ThreadKey, method: &str) -> Option<ThreadMethodCounter> {
        self.threads.get(thread)?.get(method).copied()
    }

    pub fn threads(&self) -> impl Iterator<Item = (&ThreadKey, &BTreeMap<String, ThreadMethodCounter>)> {
        self.threads.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn clear(&mut self) {
        self.threads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_created_lazily() {
        let mut table = CounterTable::default();
        let key = ThreadKey::new("main", 1);
        assert!(table.get(&key, "a").is_none());

        table.record_invocation(&key, "a");
        table.record_invocation(&key, "a");
        table.add_time(&key, "a", 15);
        table.add_time(&key, "b", 4);

        assert_eq!(
            table.get(&key, "a"),
            Some(ThreadMethodCounter { invocations: 2, total_time_ms: 15 })
        );
        assert_eq!(
            table.get(&key, "b"),
            Some(ThreadMethodCounter { invocations: 0, total_time_ms: 4 })
        );

        table.clear();
        assert!(table.is_empty());
    }
}
