//! Observability for the change tracker
//!
//! Logging goes through `tracing`. This module owns the subscriber setup:
//! level and output format come from `LoggingConfig`, and `RUST_LOG`
//! overrides the configured level when set.
//!
//! # Usage
//!
//! ```ignore
//! use config_change_tracker::observability::{self, LoggingConfig};
//!
//! observability::init(&LoggingConfig::default())?;
//! tracing::info!(rule_name = "FirewallRule1", "Config change created");
//! ```

mod logging;

pub use logging::{init, LogFormat, LoggingConfig};

use thiserror::Error;

/// Logging setup errors
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// Level or filter directive could not be parsed
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// Log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
