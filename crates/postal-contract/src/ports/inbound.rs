//! # Inbound Ports
//!
//! API trait defining what the postal contract can do.

use crate::domain::{Address, LedgerError, Shipment, TrackNumber, User};
use crate::events::{ActionOutcome, ActionRequest};
use async_trait::async_trait;

/// Postal contract API - inbound port.
#[async_trait]
pub trait PostalContractApi: Send + Sync {
    /// Execute one signed action. Writes are committed iff this returns `Ok`.
    async fn execute(&self, request: ActionRequest) -> Result<ActionOutcome, LedgerError>;

    /// Read a user record without going through an action.
    async fn user_info(&self, address: &Address) -> Result<Option<User>, LedgerError>;

    /// Read a shipment record without going through an action.
    async fn shipment(&self, track_number: &TrackNumber) -> Result<Option<Shipment>, LedgerError>;
}
