//! # Domain Errors
//!
//! Error types for the postal ledger contract.
//!
//! Every handler fails fast on the first violated precondition. The failure is
//! surfaced verbatim to the caller and no staged write survives it.

use super::keys::StateKey;
use serde::Serialize;
use thiserror::Error;

/// Classification of a rejected action, as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Duplicate registration or genesis.
    AlreadyExists,
    /// Role or ownership mismatch.
    AuthorizationDenied,
    /// Parameter out of range, insufficient balance.
    ValidationFailed,
    /// Required record is absent.
    NotFound,
    /// Status not eligible for the requested transition.
    IllegalStateTransition,
    /// Past the transfer lifetime or the delivery deadline.
    Expired,
    /// Engine or storage fault (unknown action, undeclared key, backend error).
    Internal,
}

/// Ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Record already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Caller lacks the role or ownership the action requires.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// Parameter or balance check failed.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Record not found in contract state.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Status does not allow the requested transition.
    #[error("Illegal state transition: {from} -> {to}")]
    IllegalStateTransition {
        /// Current status
        from: String,
        /// Attempted status
        to: String,
    },

    /// Time window elapsed.
    #[error("Expired: {what} (deadline {deadline}, now {now})")]
    Expired {
        /// What expired
        what: String,
        /// Deadline in unix seconds
        deadline: u64,
        /// Block time in unix seconds
        now: u64,
    },

    /// No handler for the action name.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A handler touched a key it did not declare in its read set.
    #[error("Key not preloaded: {0}")]
    KeyNotPreloaded(StateKey),

    /// Storage backend failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::AuthorizationDenied(_) => ErrorKind::AuthorizationDenied,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::IllegalStateTransition { .. } => ErrorKind::IllegalStateTransition,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::UnknownAction(_) | Self::KeyNotPreloaded(_) | Self::Store(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Shorthand for a validation failure.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Shorthand for an authorization failure.
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::AuthorizationDenied(msg.into())
    }
}

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend cannot serve the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Stored value does not decode as the expected record.
    #[error("Corrupted record at {key}: {reason}")]
    Corrupted {
        /// Storage key
        key: String,
        /// Decoder message
        reason: String,
    },
}
