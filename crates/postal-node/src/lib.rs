//! # Postal Node
//!
//! Local host for the postal ledger contract.
//!
//! The node plays the part of the execution environment: it owns the state
//! store, hands each signed request to the contract, and reports the result.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (TOML file, then environment overrides)
//! 2. Install logging
//! 3. Build the contract service over an in-memory store
//! 4. Replay the request file, one result line per request

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod runner;

pub use config::{NodeConfig, NodeConfigError, DAY_LENGTH_ENV};
pub use runner::{replay, ReplayReport};
