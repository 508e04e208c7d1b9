//! Telemetry provider capability and snapshot capture.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors reported by a telemetry read.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The platform or provider has no equivalent figure.
    #[error("telemetry field unavailable")]
    Unavailable,

    #[error("telemetry read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("telemetry parse error: {0}")]
    Parse(String),
}

/// Source of per-invocation resource figures.
///
/// Called on the thread that ran the monitored operation, right after it
/// finished. Implementations must be cheap and synchronous.
pub trait TelemetryProvider: Send + Sync {
    /// Total CPU time consumed by the current thread.
    fn cpu_time(&self) -> Result<Duration, TelemetryError>;

    /// User-mode CPU time consumed by the current thread.
    fn user_time(&self) -> Result<Duration, TelemetryError>;

    /// Bytes allocated by the current thread.
    fn allocated_bytes(&self) -> Result<u64, TelemetryError>;

    /// Number of code units (classes, modules) loaded by the process.
    fn loaded_class_count(&self) -> Result<u64, TelemetryError>;
}

/// Figures captured at invocation exit. Absent fields were unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub cpu_time: Option<Duration>,
    pub user_time: Option<Duration>,
    pub allocated_bytes: Option<u64>,
    pub loaded_class_count: Option<u64>,
}

impl TelemetrySnapshot {
    /// Read every field from `provider`, discarding failures.
    ///
    /// Each field is read on its own, so an error or panic in one read
    /// omits only that field. Returns `None` when no field could be read.
    pub fn capture(provider: &dyn TelemetryProvider) -> Option<Self> {
        let snapshot = Self {
            cpu_time: field("cpu_time", || provider.cpu_time()),
            user_time: field("user_time", || provider.user_time()),
            allocated_bytes: field("allocated_bytes", || provider.allocated_bytes()),
            loaded_class_count: field("loaded_class_count", || provider.loaded_class_count()),
        };
        (!snapshot.is_empty()).then_some(snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_time.is_none()
            && self.user_time.is_none()
            && self.allocated_bytes.is_none()
            && self.loaded_class_count.is_none()
    }
}

fn field<T>(name: &'static str, read: impl FnOnce() -> Result<T, TelemetryError>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(read)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(TelemetryError::Unavailable)) => None,
        Ok(Err(e)) => {
            tracing::trace!(field = name, error = %e, "Telemetry read failed");
            None
        }
        Err(_) => {
            tracing::debug!(field = name, "Telemetry provider panicked; field omitted");
            None
        }
    }
}

/// Provider with no capabilities. Snapshots are always omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTelemetry;

impl TelemetryProvider for NoTelemetry {
    fn cpu_time(&self) -> Result<Duration, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn user_time(&self) -> Result<Duration, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn allocated_bytes(&self) -> Result<u64, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn loaded_class_count(&self) -> Result<u64, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }
}

/// Provider returning constant figures; `None` fields are unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedTelemetry(pub TelemetrySnapshot);

impl TelemetryProvider for FixedTelemetry {
    fn cpu_time(&self) -> Result<Duration, TelemetryError> {
        self.0.cpu_time.ok_or(TelemetryError::Unavailable)
    }

    fn user_time(&self) -> Result<Duration, TelemetryError> {
        self.0.user_time.ok_or(TelemetryError::Unavailable)
    }

    fn allocated_bytes(&self) -> Result<u64, TelemetryError> {
        self.0.allocated_bytes.ok_or(TelemetryError::Unavailable)
    }

    fn loaded_class_count(&self) -> Result<u64, TelemetryError> {
        self.0.loaded_class_count.ok_or(TelemetryError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky;

    impl TelemetryProvider for Flaky {
        fn cpu_time(&self) -> Result<Duration, TelemetryError> {
            Ok(Duration::from_millis(12))
        }

        fn user_time(&self) -> Result<Duration, TelemetryError> {
            Err(TelemetryError::Parse("garbage".into()))
        }

        fn allocated_bytes(&self) -> Result<u64, TelemetryError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom").into())
        }

        fn loaded_class_count(&self) -> Result<u64, TelemetryError> {
            Err(TelemetryError::Unavailable)
        }
    }

    struct Panicky;

    impl TelemetryProvider for Panicky {
        fn cpu_time(&self) -> Result<Duration, TelemetryError> {
            panic!("provider bug")
        }

        fn user_time(&self) -> Result<Duration, TelemetryError> {
            Err(TelemetryError::Unavailable)
        }

        fn allocated_bytes(&self) -> Result<u64, TelemetryError> {
            Ok(4096)
        }

        fn loaded_class_count(&self) -> Result<u64, TelemetryError> {
            panic!("provider bug")
        }
    }

    #[test]
    fn test_failed_fields_are_omitted() {
        let snapshot = TelemetrySnapshot::capture(&Flaky).unwrap();
        assert_eq!(snapshot.cpu_time, Some(Duration::from_millis(12)));
        assert_eq!(snapshot.user_time, None);
        assert_eq!(snapshot.allocated_bytes, None);
        assert_eq!(snapshot.loaded_class_count, None);
    }

    #[test]
    fn test_no_capabilities_means_no_snapshot() {
        assert!(TelemetrySnapshot::capture(&NoTelemetry).is_none());
    }

    #[test]
    fn test_panicking_read_omits_only_that_field() {
        let snapshot = TelemetrySnapshot::capture(&Panicky).unwrap();
        assert_eq!(snapshot.cpu_time, None);
        assert_eq!(snapshot.user_time, None);
        assert_eq!(snapshot.allocated_bytes, Some(4096));
        assert_eq!(snapshot.loaded_class_count, None);
    }

    #[test]
    fn test_fixed_round_trips_its_figures() {
        let figures = TelemetrySnapshot {
            cpu_time: Some(Duration::from_micros(1500)),
            user_time: None,
            allocated_bytes: Some(2048),
            loaded_class_count: Some(42),
        };
        let captured = TelemetrySnapshot::capture(&FixedTelemetry(figures.clone())).unwrap();
        assert_eq!(captured, figures);
    }
}
