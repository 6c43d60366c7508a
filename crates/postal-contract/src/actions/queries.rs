//! Read-only lookups. Nothing is staged.

use crate::adapters::ContractState;
use crate::domain::{Address, LedgerError, TrackNumber};
use crate::events::ActionOutcome;

pub(super) fn user_info(
    state: &ContractState,
    address: &Address,
) -> Result<ActionOutcome, LedgerError> {
    Ok(ActionOutcome::User(state.try_user(address)?))
}

pub(super) fn shipment(
    state: &ContractState,
    track: &TrackNumber,
) -> Result<ActionOutcome, LedgerError> {
    Ok(ActionOutcome::Shipment(state.try_shipment(track)?))
}
