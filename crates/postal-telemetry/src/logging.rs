//! Structured logging through `tracing-subscriber`.
//!
//! Plain output is meant for local runs; JSON output carries the same fields
//! (`timestamp`, `level`, `target`, span fields such as `correlation_id`) for
//! log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by [`init_logging`]. Logs a shutdown line when dropped.
#[derive(Debug)]
pub struct LoggingGuard {
    service_name: String,
}

impl LoggingGuard {
    /// Service name the subscriber was installed for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down logging");
    }
}

/// Build the level filter for `config`.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level '{}': {e}", config.log_level)))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::SubscriberInit`] if a global subscriber is
/// already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = build_filter(config)?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(config.ansi);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        service_name: config.service_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_directives() {
        let mut config = TelemetryConfig::default();
        config.log_level = "postal_contract=debug,warn".to_string();
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_filter_rejects_bad_level() {
        let mut config = TelemetryConfig::default();
        config.log_level = "postal_contract=loud".to_string();
        assert!(matches!(
            build_filter(&config),
            Err(TelemetryError::Config(_))
        ));
    }

    // The only test in this crate that touches the global subscriber.
    #[test]
    fn test_second_init_is_an_error() {
        let config = TelemetryConfig {
            ansi: false,
            ..TelemetryConfig::default()
        };
        let guard = init_logging(&config).unwrap();
        assert_eq!(guard.service_name(), "postal-node");

        let second = init_logging(&config);
        assert!(matches!(second, Err(TelemetryError::SubscriberInit(_))));
    }
}
