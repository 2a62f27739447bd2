//! # Private-Ratings Telemetry
//!
//! Structured logging for every binary in the workspace. Library crates only
//! emit `tracing` events (prefixed `[pr-0N]`); binaries call
//! [`init_telemetry`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pr_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PR_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `PR_JSON_LOGS` | `false` | JSON lines instead of text |
//! | `PR_CONSOLE_OUTPUT` | `true` | Log to stderr |
//! | `PR_LOG_FILE` | unset | Append to a file instead of stderr |
//! | `PR_SERVICE_NAME` | `private-ratings` | Service name |
//! | `PR_SUBSYSTEM_ID` | `00` | Subsystem identifier |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, open_log_file};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Filter directives could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// The log file could not be opened.
    #[error("Cannot open log file {path}: {reason}")]
    LogFile {
        /// File path.
        path: String,
        /// OS error text.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;
    Ok(TelemetryGuard {
        service_name: config.full_service_name(),
    })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry for {}", self.service_name);
    }
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use pr_telemetry::subsystem_span;
///
/// let _span = subsystem_span!("reconcile", subsystem = "pr-04", generation = 3).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_service() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "private-ratings");
    }

    #[test]
    fn test_second_init_fails() {
        let path = std::env::temp_dir().join(format!("pr-telemetry-init-{}.log", std::process::id()));
        let config = TelemetryConfig::default().with_log_file(&path);
        let first = init_telemetry(config.clone());
        assert!(first.is_ok());
        assert!(matches!(
            init_telemetry(config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
        drop(first);
        let _ = std::fs::remove_file(&path);
    }
}
