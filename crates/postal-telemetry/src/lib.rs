//! # Postal Telemetry
//!
//! Logging setup for the postal ledger host.
//!
//! The ledger engine only emits `tracing` events and spans; this crate installs
//! the subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use postal_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_logging(&config)?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PC_SERVICE_NAME` | `postal-node` | Service name on log lines |
//! | `PC_LOG_LEVEL` | `info` | Log level filter, falls back to `RUST_LOG` |
//! | `PC_JSON_LOGS` | `false` | Emit JSON instead of plain text |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed
    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),

    /// The configuration could not be turned into a filter
    #[error("Invalid configuration: {0}")]
    Config(String),
}
