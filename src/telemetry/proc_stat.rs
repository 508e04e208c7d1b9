//! Thread CPU figures from procfs.
//!
//! Reads `/proc/thread-self/stat` on Linux. Allocation and loaded-code
//! figures have no procfs equivalent and are reported unavailable.

use std::time::Duration;

use super::provider::{TelemetryError, TelemetryProvider};

/// Kernel clock ticks per second as exposed to userspace in procfs.
const USER_HZ: u64 = 100;

const STAT_PATH: &str = "/proc/thread-self/stat";

/// CPU ticks of one thread, split by mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadTimes {
    pub user_ticks: u64,
    pub system_ticks: u64,
}

impl ThreadTimes {
    pub fn user(&self) -> Duration {
        ticks_to_duration(self.user_ticks)
    }

    pub fn total(&self) -> Duration {
        ticks_to_duration(self.user_ticks + self.system_ticks)
    }
}

fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::from_millis(ticks * 1000 / USER_HZ)
}

/// Parse the `utime` and `stime` columns of a `stat` line.
///
/// The command name may contain spaces and parentheses, so fields are
/// counted from the last `)`.
pub fn parse_stat(content: &str) -> Result<ThreadTimes, TelemetryError> {
    let (_, rest) = content
        .rsplit_once(')')
        .ok_or_else(|| TelemetryError::Parse("missing command terminator".into()))?;
    let fields: Vec<&str> = rest.split_whitespace().collect();

    // rest starts at field 3 (state); utime and stime are fields 14 and 15.
    let column = |index: usize| -> Result<u64, TelemetryError> {
        fields
            .get(index)
            .ok_or_else(|| TelemetryError::Parse(format!("stat has only {} fields", fields.len() + 2)))?
            .parse::<u64>()
            .map_err(|e| TelemetryError::Parse(e.to_string()))
    };

    Ok(ThreadTimes {
        user_ticks: column(11)?,
        system_ticks: column(12)?,
    })
}

/// Default provider for Linux hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcTelemetry;

impl ProcTelemetry {
    #[cfg(target_os = "linux")]
    fn thread_times(&self) -> Result<ThreadTimes, TelemetryError> {
        let content = std::fs::read_to_string(STAT_PATH)?;
        parse_stat(&content)
    }

    #[cfg(not(target_os = "linux"))]
    fn thread_times(&self) -> Result<ThreadTimes, TelemetryError> {
        let _ = STAT_PATH;
        Err(TelemetryError::Unavailable)
    }
}

impl TelemetryProvider for ProcTelemetry {
    fn cpu_time(&self) -> Result<Duration, TelemetryError> {
        self.thread_times().map(|t| t.total())
    }

    fn user_time(&self) -> Result<Duration, TelemetryError> {
        self.thread_times().map(|t| t.user())
    }

    fn allocated_bytes(&self) -> Result<u64, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn loaded_class_count(&self) -> Result<u64, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "4242 (tokio-runtime (w)) S 1 4242 4242 0 -1 4194368 120 0 0 0 37 5 0 0 20 0 9 0 1234 0 0";

    #[test]
    fn test_parse_stat_with_tricky_comm() {
        let times = parse_stat(SAMPLE).unwrap();
        assert_eq!(times.user_ticks, 37);
        assert_eq!(times.system_ticks, 5);
        assert_eq!(times.user(), Duration::from_millis(370));
        assert_eq!(times.total(), Duration::from_millis(420));
    }

    #[test]
    fn test_parse_stat_rejects_truncated_line() {
        let err = parse_stat("1 (x) S 1 2").unwrap_err();
        assert!(matches!(err, TelemetryError::Parse(_)));
        assert!(parse_stat("no terminator").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_reads_current_thread() {
        let provider = ProcTelemetry;
        assert!(provider.cpu_time().is_ok());
        assert!(matches!(provider.allocated_bytes(), Err(TelemetryError::Unavailable)));
    }
}
