//! Genesis, registration and role administration.

use super::ActionContext;
use crate::adapters::ContractState;
use crate::domain::{
    invariant_actor_role, invariant_not_registered, invariant_target_role, Address, CounterKey,
    LedgerError, Role, User,
};
use crate::events::ActionOutcome;
use tracing::debug;

pub(super) fn init(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
) -> Result<ActionOutcome, LedgerError> {
    for counter in CounterKey::ALL {
        if state.try_counter(counter)?.is_some() {
            return Err(LedgerError::AlreadyExists(
                "contract already initialized".to_string(),
            ));
        }
    }

    let genesis = &ctx.config.genesis;
    state.set_counter(CounterKey::AdminCount, genesis.admin_count())?;
    state.set_counter(CounterKey::UserCount, genesis.users.len() as u64)?;
    state.set_counter(CounterKey::ShipmentCount, 0)?;
    state.set_counter(CounterKey::TransferCount, 0)?;

    for seed in &genesis.users {
        state.set_user(&seed.to_user())?;
    }

    debug!(users = genesis.users.len(), "Seeded genesis users");
    Ok(ActionOutcome::Applied)
}

pub(super) fn register(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    name: &str,
    home_address: Option<String>,
) -> Result<ActionOutcome, LedgerError> {
    invariant_not_registered(state.try_user(ctx.sender)?.as_ref())?;
    if name.trim().is_empty() {
        return Err(LedgerError::invalid("name must not be empty"));
    }

    let count = state.counter(CounterKey::UserCount)?;
    let user = User::registered(ctx.sender.clone(), name.to_string(), home_address);
    state.set_user(&user)?;
    state.set_counter(CounterKey::UserCount, count.saturating_add(1))?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn update_profile(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    name: &str,
    home_address: Option<String>,
) -> Result<ActionOutcome, LedgerError> {
    let mut user = state.user(ctx.sender)?;
    if name.trim().is_empty() {
        return Err(LedgerError::invalid("name must not be empty"));
    }
    user.name = name.to_string();
    user.home_address = home_address;
    state.set_user(&user)?;
    Ok(ActionOutcome::Applied)
}

/// Load the caller and require the admin role.
fn require_admin(
    ctx: &ActionContext<'_>,
    state: &ContractState,
    action: &str,
) -> Result<User, LedgerError> {
    let admin = state.user(ctx.sender)?;
    invariant_actor_role(&admin, Role::Admin, action)?;
    Ok(admin)
}

fn require_office(office_id: &str) -> Result<(), LedgerError> {
    if office_id.trim().is_empty() {
        return Err(LedgerError::invalid("office id must not be empty"));
    }
    Ok(())
}

pub(super) fn add_employee(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    target: &Address,
    office_id: &str,
) -> Result<ActionOutcome, LedgerError> {
    require_admin(ctx, state, "adminAddEmployee")?;
    let mut user = state.user(target)?;
    invariant_target_role(&user, Role::User, "adminAddEmployee")?;
    require_office(office_id)?;

    user.promote_to_employee(office_id.to_string());
    state.set_user(&user)?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn remove_employee(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    target: &Address,
) -> Result<ActionOutcome, LedgerError> {
    require_admin(ctx, state, "adminRemoveEmployee")?;
    let mut employee = state.user(target)?;
    invariant_target_role(&employee, Role::Employee, "adminRemoveEmployee")?;

    employee.demote_to_user();
    state.set_user(&employee)?;
    Ok(ActionOutcome::Applied)
}

pub(super) fn change_office(
    ctx: &ActionContext<'_>,
    state: &mut ContractState,
    target: &Address,
    new_office_id: &str,
) -> Result<ActionOutcome, LedgerError> {
    require_admin(ctx, state, "adminChangeOffice")?;
    let mut employee = state.user(target)?;
    invariant_target_role(&employee, Role::Employee, "adminChangeOffice")?;
    require_office(new_office_id)?;

    employee.office_id = Some(new_office_id.to_string());
    state.set_user(&employee)?;
    Ok(ActionOutcome::Applied)
}
