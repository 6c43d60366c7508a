//! Node configuration loaded from a TOML file.
//!
//! ```toml
//! [contract]
//! day_length_secs = 86400
//! max_weight_kg = "10"
//! track_prefix = "RR"
//!
//! [contract.tariffs.first]
//! cost_per_kg = "0.5"
//! lead_time_days = 5
//!
//! [telemetry]
//! log_level = "postal_contract=debug,info"
//! json_logs = false
//! ```
//!
//! Missing tables and fields fall back to their defaults.

use postal_contract::{ConfigError as ContractConfigError, ContractConfig};
use postal_telemetry::TelemetryConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `contract.day_length_secs`.
pub const DAY_LENGTH_ENV: &str = "PC_DAY_LENGTH_SECS";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum NodeConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Environment override could not be parsed.
    #[error("Invalid {var}={value}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Contract configuration rejected.
    #[error("Invalid contract config: {0}")]
    Contract(#[from] ContractConfigError),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Contract tariffs, limits and genesis users.
    pub contract: ContractConfig,
    /// Logging setup.
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NodeConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| NodeConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, NodeConfigError> {
        toml::from_str(content).map_err(|e| NodeConfigError::Parse(e.to_string()))
    }

    /// Apply `PC_DAY_LENGTH_SECS` and the telemetry environment variables.
    pub fn with_env_overrides(self) -> Result<Self, NodeConfigError> {
        let mut config = self.with_day_length(env::var(DAY_LENGTH_ENV).ok().as_deref())?;
        config.telemetry = config.telemetry.with_env_overrides();
        Ok(config)
    }

    /// Override the day length from a raw string value, if present.
    pub fn with_day_length(mut self, raw: Option<&str>) -> Result<Self, NodeConfigError> {
        if let Some(raw) = raw {
            self.contract.day_length_secs =
                raw.trim().parse().map_err(|_| NodeConfigError::Env {
                    var: DAY_LENGTH_ENV,
                    value: raw.to_string(),
                })?;
        }
        Ok(self)
    }

    /// Validate the contract section.
    pub fn validate(&self) -> Result<(), NodeConfigError> {
        self.contract.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = NodeConfig::parse("").unwrap();
        assert_eq!(config.contract, ContractConfig::default());
        assert_eq!(config.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = NodeConfig::parse(
            r#"
            [contract]
            day_length_secs = 86400
            track_prefix = "EE"

            [telemetry]
            json_logs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.contract.day_length_secs, 86_400);
        assert_eq!(config.contract.track_prefix, "EE");
        assert_eq!(config.contract.transfer_prefix, "TR");
        assert!(config.telemetry.json_logs);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_parse_error() {
        let err = NodeConfig::parse("[contract\n").unwrap_err();
        assert!(matches!(err, NodeConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[contract]\nday_length_secs = 60").unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.contract.day_length_secs, 60);
    }

    #[test]
    fn test_missing_file() {
        let err = NodeConfig::load("/nonexistent/postal.toml").unwrap_err();
        assert!(matches!(err, NodeConfigError::Io { .. }));
    }

    #[test]
    fn test_day_length_override() {
        let config = NodeConfig::default().with_day_length(Some("86400")).unwrap();
        assert_eq!(config.contract.day_length_secs, 86_400);

        let untouched = NodeConfig::default().with_day_length(None).unwrap();
        assert_eq!(untouched.contract.day_length_secs, 7_200);

        let err = NodeConfig::default().with_day_length(Some("a day")).unwrap_err();
        assert!(matches!(err, NodeConfigError::Env { .. }));
    }

    #[test]
    fn test_zero_day_length_fails_validation() {
        let config = NodeConfig::default().with_day_length(Some("0")).unwrap();
        assert!(matches!(
            config.validate(),
            Err(NodeConfigError::Contract(ContractConfigError::ZeroDayLength))
        ));
    }
}
