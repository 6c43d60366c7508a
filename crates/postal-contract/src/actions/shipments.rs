//! Shipment lifecycle.
//!
//! ```text
//! createShipment -> created -> transitShipment -> in_transit -> deliverShipment -> delivered
//!                      |                              |
//!                      +------- refuseShipment -------+-> refused
//! ```

use super::{ActionContext, NewShipment};
use crate::adapters::ContractState;
use crate::algorithms::{quote, track_number};
use crate::domain::{
    employee_office, invariant_actor_role, invariant_can_refuse_shipment, invariant_non_negative,
    invariant_sufficient_balance, invariant_weight, CounterKey,
    HistoryEntry, LedgerError, Role, Shipment, ShipmentParams, ShipmentStatus, StateKey,
    TrackNumber, User,
};
use crate::events::ActionOutcome;
use tracing::debug;

/// Tracking number the caller's next shipment would get, with its sequence.
///
/// `None` when the caller is not an employee with an office or the counter
/// is not seeded yet.
pub(super) fn next_track_number(
    ctx: &ActionContext<'_>,
    state: &ContractState,
    to_address: &str,
) -> Result<Option<(TrackNumber, u64)>, LedgerError> {
    let Some(employee) = state.try_user(ctx.sender)? else {
        return Ok(None);
    };
    let Ok(office) = employee_office(&employee) else {
        return Ok(None);
    };
    let Some(count) = state.try_counter(CounterKey::ShipmentCount)? else {
        return Ok(None);
    };
    let sequence = count
        .checked_add(1)
        .ok_or_else(|| LedgerError::invalid("shipment counter overflow"))?;
    let track = track_number(
        &ctx.config.track_prefix,
        ctx.now,
        sequence,
        office,
        to_address,
    )?;
    Ok(Some((track, sequence)))
}

/// Load the caller and require the employee role.
fn require_employee(
    ctx: &ActionContext<'_>,
    state: &ContractState,
    action: &str,
) -> Result<User, LedgerError> {
    let employee = state.user(ctx.sender)?;
    invariant_actor_role(&employee, Role::Employee, action)?;
    Ok(employee)
}

fn handled_by(ctx: &ActionContext<'_>, office_id: &str) -> HistoryEntry {
    HistoryEntry {
        timestamp: ctx.now,
        office_id: office_id.to_string(),
        employee: ctx.sender.clone(),
    }
}

fn reject_terminal(shipment: &Shipment, next: ShipmentStatus) -> Result<(), LedgerError> {
    if shipment.status.is_terminal() {
        return Err(LedgerError::IllegalStateTransition {
            from: shipment.status.to_string(),
            to: next.to_string(),
        });
    }
    Ok(())
}

pub(super) fn create(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    new: &NewShipment,
) -> Result<ActionOutcome, LedgerError> {
    let mut employee = require_employee(ctx, state, "createShipment")?;
    let office = employee_office(&employee)?.to_string();

    invariant_weight(new.weight, ctx.config.max_weight_kg)?;
    invariant_non_negative(new.declared_value, "declaredValue")?;

    let priced = quote(
        ctx.config,
        new.class,
        new.weight,
        new.declared_value,
        ctx.now,
    )?;
    invariant_sufficient_balance(&employee, priced.total_cost)?;

    let (track, sequence) = next_track_number(ctx, state, &new.to_address)?
        .ok_or_else(|| LedgerError::NotFound("counter SHIPMENT_COUNT".to_string()))?;
    if state.contains(&StateKey::Shipment(track.clone()))? {
        return Err(LedgerError::AlreadyExists(format!("shipment {track}")));
    }

    let shipment = Shipment::new(
        ShipmentParams {
            track_number: track.clone(),
            sender: ctx.sender.clone(),
            recipient: new.recipient.clone(),
            shipment_type: new.shipment_type,
            class: new.class,
            weight: new.weight,
            declared_value: new.declared_value,
            from_address: new.from_address.clone(),
            to_address: new.to_address.clone(),
        },
        priced.delivery_cost,
        priced.total_cost,
        priced.delivery_deadline,
        handled_by(ctx, &office),
    );
    employee.debit(priced.total_cost)?;

    state.set_shipment(&shipment)?;
    state.set_counter(CounterKey::ShipmentCount, sequence)?;
    state.set_user(&employee)?;

    debug!(track = %track, total_cost = %priced.total_cost, "Shipment priced");
    Ok(ActionOutcome::Applied)
}

pub(super) fn transit(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    track: &TrackNumber,
) -> Result<ActionOutcome, LedgerError> {
    let employee = require_employee(ctx, state, "transitShipment")?;
    let mut shipment = state.shipment(track)?;
    reject_terminal(&shipment, ShipmentStatus::InTransit)?;
    let office = employee_office(&employee)?;

    // created -> in_transit; in_transit stays put and only gains history
    shipment.transition_to(ShipmentStatus::InTransit)?;
    shipment.record_handling(handled_by(ctx, office));
    state.set_shipment(&shipment)?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn deliver(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    track: &TrackNumber,
) -> Result<ActionOutcome, LedgerError> {
    let employee = require_employee(ctx, state, "deliverShipment")?;
    let mut shipment = state.shipment(track)?;
    if shipment.status != ShipmentStatus::InTransit {
        return Err(LedgerError::IllegalStateTransition {
            from: shipment.status.to_string(),
            to: ShipmentStatus::Delivered.to_string(),
        });
    }
    if shipment.is_past_deadline(ctx.now) {
        return Err(LedgerError::Expired {
            what: format!("delivery of {track}"),
            deadline: shipment.delivery_deadline,
            now: ctx.now,
        });
    }
    let office = employee_office(&employee)?;

    shipment.transition_to(ShipmentStatus::Delivered)?;
    shipment.record_handling(handled_by(ctx, office));
    state.set_shipment(&shipment)?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn refuse(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    track: &TrackNumber,
) -> Result<ActionOutcome, LedgerError> {
    let mut shipment = state.shipment(track)?;
    reject_terminal(&shipment, ShipmentStatus::Refused)?;
    let actor = state.try_user(ctx.sender)?;
    invariant_can_refuse_shipment(actor.as_ref(), ctx.sender, &shipment)?;

    // Refusal leaves the history untouched
    shipment.transition_to(ShipmentStatus::Refused)?;
    state.set_shipment(&shipment)?;
    Ok(ActionOutcome::Applied)
}
