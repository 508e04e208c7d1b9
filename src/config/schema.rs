//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// Live monitoring settings, swapped atomically on toggle or reload.
pub type SharedConfig = Arc<ArcSwap<MonitoringConfig>>;

/// Root configuration file layout.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Recording and pruning settings.
    pub monitoring: MonitoringConfig,

    /// Logging settings for the hosting process.
    pub observability: ObservabilityConfig,
}

impl MonitorConfig {
    /// Wrap the monitoring section for sharing with a recorder.
    pub fn shared(&self) -> SharedConfig {
        Arc::new(ArcSwap::from_pointee(self.monitoring.clone()))
    }
}

/// Settings consulted by the recording hooks on every call.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Master switch. Checked once at invocation entry.
    pub enabled: bool,

    /// Run pruning inline after every terminal event.
    pub log_pruning_enabled: bool,

    /// Maximum number of events kept in the log.
    pub max_event_log_size: usize,

    /// Events older than this many hours are eligible for pruning.
    pub max_event_log_age_hours: u64,

    /// Capture the caller's stack on START events.
    pub stack_trace_enabled: bool,

    /// Number of frames kept when stack capture is enabled.
    pub stack_trace_depth: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_pruning_enabled: true,
            max_event_log_size: 10_000,
            max_event_log_age_hours: 24,
            stack_trace_enabled: false,
            stack_trace_depth: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.monitoring.enabled);
        assert!(config.monitoring.log_pruning_enabled);
        assert_eq!(config.monitoring.max_event_log_size, 10_000);
        assert_eq!(config.monitoring.max_event_log_age_hours, 24);
        assert!(!config.monitoring.stack_trace_enabled);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [monitoring]
            max_event_log_size = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.monitoring.max_event_log_size, 50);
        assert!(config.monitoring.enabled);
        assert_eq!(config.monitoring.stack_trace_depth, 5);
    }

    #[test]
    fn test_shared_reflects_swaps() {
        let config = MonitorConfig::default();
        let shared = config.shared();
        assert!(shared.load().enabled);

        let mut disabled = config.monitoring.clone();
        disabled.enabled = false;
        shared.store(Arc::new(disabled));
        assert!(!shared.load().enabled);
    }
}
