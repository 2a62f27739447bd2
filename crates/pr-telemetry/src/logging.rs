//! Subscriber setup.
//!
//! One output layer is chosen from the configuration: a file sink (plain or
//! JSON, never ANSI), JSON on stderr, pretty text on stderr, or nothing.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::{TelemetryConfig, TelemetryError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Parse the configured filter directives.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TelemetryError::LogFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

fn output_layer(config: &TelemetryConfig) -> Result<Option<BoxedLayer>, TelemetryError> {
    if let Some(path) = &config.log_file {
        let writer = Mutex::new(open_log_file(path)?);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        return Ok(Some(if config.json_logs {
            layer.json().boxed()
        } else {
            layer.boxed()
        }));
    }
    if !config.console_output {
        return Ok(None);
    }
    let layer = if config.json_logs {
        // JSON output for log shippers
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        // Pretty output for development
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };
    Ok(Some(layer))
}

/// Install the global subscriber.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    tracing_subscriber::registry()
        .with(output_layer(config)?)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.full_service_name(),
        json = config.json_logs,
        file = ?config.log_file,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_target_directives() {
        let config = TelemetryConfig {
            log_level: "info,pr_04_card_reconciliation=debug".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_open_log_file_creates_file() {
        let path = std::env::temp_dir().join(format!("pr-telemetry-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        open_log_file(&path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_log_file_reports_path() {
        let path = std::env::temp_dir().join("pr-telemetry-missing-dir").join("x.log");
        match open_log_file(&path) {
            Err(TelemetryError::LogFile { path: reported, .. }) => {
                assert!(reported.ends_with("x.log"))
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_console_disabled_without_file_has_no_layer() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        assert!(output_layer(&config).unwrap().is_none());
    }
}
