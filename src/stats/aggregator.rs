//! Per-thread and per-method aggregate views over the counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::recording::counters::{CounterTable, ThreadMethodCounter};
use crate::recording::recorder::EventRecorder;
use crate::recording::thread::ThreadKey;

/// Count, total and average execution time of one method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MethodStats {
    pub count: u64,
    pub total_time_ms: u64,
    pub avg_time_ms: u64,
}

impl MethodStats {
    pub fn from_totals(count: u64, total_time_ms: u64) -> Self {
        let avg_time_ms = if count > 0 { total_time_ms / count } else { 0 };
        Self {
            count,
            total_time_ms,
            avg_time_ms,
        }
    }
}

impl From<ThreadMethodCounter> for MethodStats {
    fn from(counter: ThreadMethodCounter) -> Self {
        Self::from_totals(counter.invocations, counter.total_time_ms)
    }
}

pub type MethodStatsTable = BTreeMap<String, MethodStats>;
pub type ThreadStatsTable = BTreeMap<ThreadKey, MethodStatsTable>;

/// Read-only views over one counter snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    counters: CounterTable,
}

impl StatsAggregator {
    pub fn new(counters: CounterTable) -> Self {
        Self { counters }
    }

    /// Snapshot the recorder's counters.
    pub fn snapshot(recorder: &EventRecorder) -> Self {
        Self::new(recorder.counters())
    }

    pub fn by_thread(&self) -> ThreadStatsTable {
        self.counters
            .threads()
            .map(|(thread, methods)| {
                let methods = methods
                    .iter()
                    .map(|(method, counter)| (method.clone(), MethodStats::from(*counter)))
                    .collect();
                (thread.clone(), methods)
            })
            .collect()
    }

    pub fn by_method(&self) -> MethodStatsTable {
        let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for (_, methods) in self.counters.threads() {
            for (method, counter) in methods {
                let (count, total) = totals.entry(method.clone()).or_default();
                *count = count.saturating_add(counter.invocations);
                *total = total.saturating_add(counter.total_time_ms);
            }
        }
        totals
            .into_iter()
            .map(|(method, (count, total))| (method, MethodStats::from_totals(count, total)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CounterTable {
        let mut counters = CounterTable::default();
        let main = ThreadKey::new("main", 1);
        let worker = ThreadKey::new("worker", 2);

        for _ in 0..2 {
            counters.record_invocation(&main, "Repo.find");
        }
        counters.add_time(&main, "Repo.find", 30);
        counters.record_invocation(&worker, "Repo.find");
        counters.add_time(&worker, "Repo.find", 11);
        counters.record_invocation(&worker, "Repo.save");
        counters
    }

    #[test]
    fn test_by_thread() {
        let stats = StatsAggregator::new(table()).by_thread();
        assert_eq!(stats.len(), 2);

        let main = &stats[&ThreadKey::new("main", 1)];
        assert_eq!(main["Repo.find"], MethodStats { count: 2, total_time_ms: 30, avg_time_ms: 15 });

        let worker = &stats[&ThreadKey::new("worker", 2)];
        assert_eq!(worker["Repo.save"], MethodStats { count: 1, total_time_ms: 0, avg_time_ms: 0 });
    }

    #[test]
    fn test_by_method_sums_threads() {
        let stats = StatsAggregator::new(table()).by_method();
        assert_eq!(stats["Repo.find"], MethodStats { count: 3, total_time_ms: 41, avg_time_ms: 13 });
        assert_eq!(stats["Repo.save"].count, 1);
    }

    #[test]
    fn test_zero_count_average() {
        assert_eq!(MethodStats::from_totals(0, 99).avg_time_ms, 0);
    }

    #[test]
    fn test_empty() {
        let aggregator = StatsAggregator::default();
        assert!(aggregator.by_thread().is_empty());
        assert!(aggregator.by_method().is_empty());
    }
}
