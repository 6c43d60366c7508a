//! Escrowed money transfers.
//!
//! Funds leave the sender's balance at `sendMoneyTransfer` and are released
//! by exactly one resolving action while the transfer is pending and inside
//! its lifetime window.

use super::ActionContext;
use crate::adapters::ContractState;
use crate::algorithms::transfer_id;
use crate::domain::{
    invariant_positive, invariant_sufficient_balance, invariant_transfer_party,
    invariant_within_deadline, Address, CounterKey, LedgerError, MoneyTransfer, StateKey,
    TransferId, TransferStatus,
};
use crate::events::ActionOutcome;
use rust_decimal::Decimal;
use tracing::warn;

/// Id the next transfer would get, with its sequence. `None` before genesis.
pub(super) fn next_transfer_id(
    ctx: &ActionContext<'_>,
    state: &ContractState,
) -> Result<Option<(TransferId, u64)>, LedgerError> {
    let Some(count) = state.try_counter(CounterKey::TransferCount)? else {
        return Ok(None);
    };
    let sequence = count
        .checked_add(1)
        .ok_or_else(|| LedgerError::invalid("transfer counter overflow"))?;
    Ok(Some((
        transfer_id(&ctx.config.transfer_prefix, sequence, ctx.timestamp_ms),
        sequence,
    )))
}

pub(super) fn send(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    recipient: &Address,
    amount: Decimal,
    lifetime_days: u64,
) -> Result<ActionOutcome, LedgerError> {
    let mut payer = state.user(ctx.sender)?;
    invariant_positive(amount, "amount")?;
    if lifetime_days == 0 {
        return Err(LedgerError::invalid("lifetimeDays must be positive"));
    }
    invariant_sufficient_balance(&payer, amount)?;

    let (id, sequence) = next_transfer_id(ctx, state)?
        .ok_or_else(|| LedgerError::NotFound("counter TRANSFER_COUNT".to_string()))?;
    if state.contains(&StateKey::Transfer(id.clone()))? {
        return Err(LedgerError::AlreadyExists(format!("transfer {id}")));
    }

    let transfer = MoneyTransfer::new(
        id,
        ctx.sender.clone(),
        recipient.clone(),
        amount,
        ctx.config.days_to_secs(lifetime_days),
        ctx.now,
    );
    payer.debit(amount)?;

    state.set_transfer(&transfer)?;
    state.set_user(&payer)?;
    state.set_counter(CounterKey::TransferCount, sequence)?;
    Ok(ActionOutcome::Applied)
}

/// Which side of the transfer may perform a resolution.
#[derive(Clone, Copy)]
enum Party {
    Sender,
    Recipient,
}

/// Load a transfer the caller may still resolve into `next`.
fn resolvable(
    ctx: &ActionContext<'_>,
    state: &ContractState,
    id: &TransferId,
    party: Party,
    next: TransferStatus,
) -> Result<MoneyTransfer, LedgerError> {
    let transfer = state.transfer(id)?;
    if transfer.status != TransferStatus::Pending {
        return Err(LedgerError::IllegalStateTransition {
            from: transfer.status.to_string(),
            to: next.to_string(),
        });
    }
    match party {
        Party::Sender => invariant_transfer_party(&transfer.sender, ctx.sender, "sender")?,
        Party::Recipient => {
            invariant_transfer_party(&transfer.recipient, ctx.sender, "recipient")?
        }
    }
    invariant_within_deadline(ctx.now, transfer.expires_at(), &format!("transfer {id}"))?;
    Ok(transfer)
}

/// Credit the caller and close the transfer.
fn release_to_caller(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    mut transfer: MoneyTransfer,
    next: TransferStatus,
) -> Result<ActionOutcome, LedgerError> {
    let mut payee = state.user(ctx.sender)?;
    payee.credit(transfer.amount)?;
    transfer.transition_to(next)?;

    state.set_user(&payee)?;
    state.set_transfer(&transfer)?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn accept(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    id: &TransferId,
) -> Result<ActionOutcome, LedgerError> {
    let transfer = resolvable(ctx, state, id, Party::Recipient, TransferStatus::Accepted)?;
    release_to_caller(ctx, state, transfer, TransferStatus::Accepted)
}

pub(super) fn cancel(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    id: &TransferId,
) -> Result<ActionOutcome, LedgerError> {
    let transfer = resolvable(ctx, state, id, Party::Sender, TransferStatus::Cancelled)?;
    release_to_caller(ctx, state, transfer, TransferStatus::Cancelled)
}

pub(super) fn refuse(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    id: &TransferId,
) -> Result<ActionOutcome, LedgerError> {
    let mut transfer = resolvable(ctx, state, id, Party::Recipient, TransferStatus::Refused)?;
    transfer.transition_to(TransferStatus::Refused)?;
    state.set_transfer(&transfer)?;

    // Escrow is not returned to the sender on refusal
    warn!(transfer = %id, amount = %transfer.amount, "Refused transfer leaves funds in escrow");
    Ok(ActionOutcome::Applied)
}
