//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated)
//!     → monitoring section published through SharedConfig
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<MonitoringConfig>
//!     → the next hook call observes the new values
//! ```
//!
//! # Design Decisions
//! - The recording path reads configuration at call time, never caches it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::MonitorConfig;
pub use schema::MonitoringConfig;
pub use schema::ObservabilityConfig;
pub use schema::SharedConfig;
