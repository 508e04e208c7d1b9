//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (log size > 0, sane stack depth)
//! - Reject unknown log levels before they reach the subscriber
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system (load and reload)

use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// Upper bound for captured stack frames.
pub const MAX_STACK_TRACE_DEPTH: usize = 64;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("max_event_log_size must be greater than 0 when log pruning is enabled")]
    ZeroLogSize,

    #[error("stack_trace_depth must be between 1 and {max}, got {depth}")]
    StackTraceDepth { depth: usize, max: usize },

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let monitoring = &config.monitoring;

    if monitoring.log_pruning_enabled && monitoring.max_event_log_size == 0 {
        errors.push(ValidationError::ZeroLogSize);
    }

    if monitoring.stack_trace_enabled
        && !(1..=MAX_STACK_TRACE_DEPTH).contains(&monitoring.stack_trace_depth)
    {
        errors.push(ValidationError::StackTraceDepth {
            depth: monitoring.stack_trace_depth,
            max: MAX_STACK_TRACE_DEPTH,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
