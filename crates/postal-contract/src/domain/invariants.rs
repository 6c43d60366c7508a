//! # Authorization Rules and Domain Invariants
//!
//! Pure decision functions over (actor, target, action). Each returns the
//! error the handler must fail with, so handlers only chain them with `?`.
//!
//! | Action | Actor | Extra condition |
//! |--------|-------|-----------------|
//! | register | new identity | no existing record |
//! | updateProfile | record owner | - |
//! | adminAddEmployee | admin | target is `user` |
//! | adminRemoveEmployee / adminChangeOffice | admin | target is `employee` |
//! | createShipment | employee | weight in (0, max]; balance >= total |
//! | transit / deliver | employee | status eligible; deliver before deadline |
//! | refuseShipment | admin or recipient | status not terminal |
//! | sendMoneyTransfer | registered user | balance >= amount |
//! | accept / refuse transfer | recipient | pending; not expired |
//! | cancel transfer | sender | pending; not expired |

use super::entities::{Shipment, User};
use super::errors::LedgerError;
use super::value_objects::{Address, Role};
use rust_decimal::Decimal;

/// Invariant: an identity registers at most once.
pub fn invariant_not_registered(existing: Option<&User>) -> Result<(), LedgerError> {
    match existing {
        Some(user) => Err(LedgerError::AlreadyExists(format!(
            "user {} already registered",
            user.address
        ))),
        None => Ok(()),
    }
}

/// Invariant: the actor holds the role the action requires.
pub fn invariant_actor_role(actor: &User, required: Role, action: &str) -> Result<(), LedgerError> {
    if !actor.has_role(required) {
        return Err(LedgerError::denied(format!(
            "{action} requires role {required}, {} is {}",
            actor.address, actor.role
        )));
    }
    Ok(())
}

/// Invariant: the target of a role change currently holds `expected`.
pub fn invariant_target_role(target: &User, expected: Role, action: &str) -> Result<(), LedgerError> {
    if !target.has_role(expected) {
        return Err(LedgerError::invalid(format!(
            "{action} applies to role {expected}, {} is {}",
            target.address, target.role
        )));
    }
    Ok(())
}

/// Invariant: `office_id` is present iff the user is an employee.
pub fn invariant_office_binding(user: &User) -> Result<(), LedgerError> {
    if user.has_role(Role::Employee) != user.office_id.is_some() {
        return Err(LedgerError::invalid(format!(
            "{} with role {} has office {:?}",
            user.address, user.role, user.office_id
        )));
    }
    Ok(())
}

/// Office of an employee actor. Fails if the office binding is broken.
pub fn employee_office(employee: &User) -> Result<&str, LedgerError> {
    match employee.office_id.as_deref() {
        Some(office) if employee.has_role(Role::Employee) => Ok(office),
        _ => Err(LedgerError::invalid(format!(
            "employee {} has no office",
            employee.address
        ))),
    }
}

/// Invariant: 0 < weight <= max.
pub fn invariant_weight(weight: Decimal, max: Decimal) -> Result<(), LedgerError> {
    if weight <= Decimal::ZERO || weight > max {
        return Err(LedgerError::invalid(format!(
            "Weight must be in (0, {max}] kg, got {weight}"
        )));
    }
    Ok(())
}

/// Invariant: a declared value or amount is not negative.
pub fn invariant_non_negative(value: Decimal, name: &str) -> Result<(), LedgerError> {
    if value.is_sign_negative() {
        return Err(LedgerError::invalid(format!("{name} must not be negative, got {value}")));
    }
    Ok(())
}

/// Invariant: a transfer amount is strictly positive.
pub fn invariant_positive(value: Decimal, name: &str) -> Result<(), LedgerError> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

/// Invariant: the payer can cover `required`.
pub fn invariant_sufficient_balance(payer: &User, required: Decimal) -> Result<(), LedgerError> {
    if payer.balance < required {
        return Err(LedgerError::invalid(format!(
            "Insufficient balance: {} has {}, needs {}",
            payer.address, payer.balance, required
        )));
    }
    Ok(())
}

/// Invariant: only an admin or the shipment's recipient may refuse it.
///
/// The caller must hold a user record.
pub fn invariant_can_refuse_shipment(
    actor: Option<&User>,
    sender: &Address,
    shipment: &Shipment,
) -> Result<(), LedgerError> {
    match actor {
        Some(user) if user.has_role(Role::Admin) || *sender == shipment.recipient => Ok(()),
        _ => Err(LedgerError::denied(format!(
            "{sender} is not authorized to refuse shipment {}",
            shipment.track_number
        ))),
    }
}

/// Invariant: the caller is the designated party of a transfer.
pub fn invariant_transfer_party(
    expected: &Address,
    sender: &Address,
    party: &str,
) -> Result<(), LedgerError> {
    if expected != sender {
        return Err(LedgerError::denied(format!(
            "only the transfer {party} may do this, {sender} is not {expected}"
        )));
    }
    Ok(())
}

/// Invariant: `now` has not passed `deadline`.
pub fn invariant_within_deadline(now: u64, deadline: u64, what: &str) -> Result<(), LedgerError> {
    if now > deadline {
        return Err(LedgerError::Expired {
            what: what.to_string(),
            deadline,
            now,
        });
    }
    Ok(())
}
