//! Logging configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or full directive
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to colour plain output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "postal-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PC_SERVICE_NAME`: Service name (default: postal-node)
    /// - `PC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PC_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of an existing configuration,
    /// typically one read from a config file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = env::var("PC_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(level) = env::var("PC_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            self.log_level = level;
        }
        if let Ok(json) = env::var("PC_JSON_LOGS") {
            self.json_logs = parse_flag(&json);
        }
        self
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
