//! Telemetry configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup line
    pub service_name: String,

    /// Subsystem identifier (01-04, 00 for binaries)
    pub subsystem_id: String,

    /// Filter directives (trace, debug, info, warn, error, or `target=level` lists)
    pub log_level: String,

    /// Whether to write to stderr when no file sink is set
    pub console_output: bool,

    /// Whether to emit JSON lines
    pub json_logs: bool,

    /// Append logs to this file instead of the console
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "private-ratings".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            log_file: None,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PR_SERVICE_NAME`: Service name (default: private-ratings)
    /// - `PR_SUBSYSTEM_ID`: Subsystem ID (default: 00)
    /// - `PR_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PR_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `PR_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `PR_LOG_FILE`: Write logs to this file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service_name: lookup("PR_SERVICE_NAME").unwrap_or(defaults.service_name),

            subsystem_id: lookup("PR_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),

            log_level: lookup("PR_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("PR_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: lookup("PR_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            log_file: lookup("PR_LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Create configuration for a specific subsystem.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        let mut config = Self::from_env();
        config.subsystem_id = subsystem_id.to_string();
        config.service_name = format!("pr-{}-{}", subsystem_id, subsystem_name);
        config
    }

    /// Send logs to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Get the full service name including subsystem.
    pub fn full_service_name(&self) -> String {
        if self.subsystem_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.subsystem_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> TelemetryConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TelemetryConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "private-ratings");
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_log_level_prefers_pr_variable() {
        let config = lookup_from(&[("RUST_LOG", "warn"), ("PR_LOG_LEVEL", "debug")]);
        assert_eq!(config.log_level, "debug");
        let config = lookup_from(&[("RUST_LOG", "warn")]);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_boolean_flags() {
        let config = lookup_from(&[("PR_JSON_LOGS", "1"), ("PR_CONSOLE_OUTPUT", "FALSE")]);
        assert!(config.json_logs);
        assert!(!config.console_output);
    }

    #[test]
    fn test_blank_log_file_is_ignored() {
        assert!(lookup_from(&[("PR_LOG_FILE", "  ")]).log_file.is_none());
        assert_eq!(
            lookup_from(&[("PR_LOG_FILE", "/tmp/pr.log")]).log_file,
            Some(PathBuf::from("/tmp/pr.log"))
        );
    }

    #[test]
    fn test_full_service_name() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.full_service_name(), "private-ratings");

        config.subsystem_id = "04".to_string();
        assert_eq!(config.full_service_name(), "private-ratings-04");
    }
}
