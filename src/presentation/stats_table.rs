//! Aligned text tables for the aggregated statistics.

use crate::stats::{MethodStats, MethodStatsTable, ThreadStatsTable};

pub const THREAD_STATS_HEADER: &str = "=== Transaction Statistics ===";
pub const METHOD_STATS_HEADER: &str = "=== Aggregated Transaction Statistics By Method ===";

/// Column widths shared by every row of one table.
#[derive(Debug, Default, Clone, Copy)]
struct Widths {
    method: usize,
    count: usize,
    total: usize,
    avg: usize,
}

impl Widths {
    fn widen(&mut self, method: &str, stats: &MethodStats) {
        self.method = self.method.max(method.chars().count());
        self.count = self.count.max(stats.count.to_string().len());
        self.total = self.total.max(stats.total_time_ms.to_string().len());
        self.avg = self.avg.max(stats.avg_time_ms.to_string().len());
    }
}

/// Per-thread table: one block per thread, one row per method.
pub fn render_stats_by_thread(table: &ThreadStatsTable) -> String {
    let mut widths = Widths::default();
    for (method, stats) in table.values().flatten() {
        widths.widen(method, stats);
    }

    let mut out = String::from(THREAD_STATS_HEADER);
    for (thread, methods) in table {
        out.push_str(&format!("\nThread ID: {} (Name: {})", thread.id(), thread.name()));
        for (method, stats) in methods {
            out.push_str(&format!(
                "\n    {:<mw$} : Count = {:>cw$}, Tot Time = {:>tw$} ms, Avg Time = {:>aw$} ms",
                method,
                stats.count,
                stats.total_time_ms,
                stats.avg_time_ms,
                mw = widths.method,
                cw = widths.count,
                tw = widths.total,
                aw = widths.avg,
            ));
        }
    }
    out
}

/// Cross-thread table, one row per method.
pub fn render_stats_by_method(table: &MethodStatsTable) -> String {
    let mut widths = Widths::default();
    for (method, stats) in table {
        widths.widen(method, stats);
    }

    let mut out = String::from(METHOD_STATS_HEADER);
    for (method, stats) in table {
        out.push_str(&format!(
            "\n    {:<mw$} : Tot Count = {:>cw$}, Tot Time = {:>tw$} ms, Overall Avg Time = {:>aw$} ms",
            method,
            stats.count,
            stats.total_time_ms,
            stats.avg_time_ms,
            mw = widths.method,
            cw = widths.count,
            tw = widths.total,
            aw = widths.avg,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::ThreadKey;
    use std::collections::BTreeMap;

    #[test]
    fn test_thread_table_alignment() {
        let mut methods = BTreeMap::new();
        methods.insert("Repo.find".to_string(), MethodStats::from_totals(12, 340));
        methods.insert("Svc.run".to_string(), MethodStats::from_totals(3, 9));
        let mut table = ThreadStatsTable::new();
        table.insert(ThreadKey::new("worker", 7), methods);

        let rendered = render_stats_by_thread(&table);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], THREAD_STATS_HEADER);
        assert_eq!(lines[1], "Thread ID: 7 (Name: worker)");
        assert_eq!(
            lines[2],
            "    Repo.find : Count = 12, Tot Time = 340 ms, Avg Time = 28 ms"
        );
        assert_eq!(
            lines[3],
            "    Svc.run   : Count =  3, Tot Time =   9 ms, Avg Time =  3 ms"
        );
    }

    #[test]
    fn test_method_table_rows() {
        let mut table = MethodStatsTable::new();
        table.insert("Repo.find".to_string(), MethodStats::from_totals(4, 10));

        let rendered = render_stats_by_method(&table);
        assert_eq!(
            rendered,
            format!(
                "{METHOD_STATS_HEADER}\n    Repo.find : Tot Count = 4, Tot Time = 10 ms, Overall Avg Time = 2 ms"
            )
        );
    }

    #[test]
    fn test_empty_tables_render_header_only() {
        assert_eq!(render_stats_by_thread(&ThreadStatsTable::new()), THREAD_STATS_HEADER);
        assert_eq!(render_stats_by_method(&MethodStatsTable::new()), METHOD_STATS_HEADER);
    }
}
