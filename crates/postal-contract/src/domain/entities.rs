//! # Domain Entities
//!
//! User, Shipment and MoneyTransfer records as persisted in contract state.
//! Field names on the wire follow the node's JSON record format (camelCase).

use super::errors::LedgerError;
use super::value_objects::{
    Address, DeliveryClass, Role, ShipmentStatus, ShipmentType, TrackNumber, TransferId,
    TransferStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered identity.
///
/// `office_id` is present iff `role == Employee`; `balance` never drops below zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name.
    pub name: String,
    /// Identity the record is keyed on.
    pub address: Address,
    /// Balance in native currency units.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Role.
    pub role: Role,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    /// Office code, employees only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<String>,
}

impl User {
    /// A freshly self-registered user: role `user`, zero balance.
    pub fn registered(address: Address, name: String, home_address: Option<String>) -> Self {
        Self {
            name,
            address,
            balance: Decimal::ZERO,
            role: Role::User,
            home_address,
            office_id: None,
        }
    }

    /// Whether the user holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Withdraw funds. Fails without touching the balance when it would go negative.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount.is_sign_negative() {
            return Err(LedgerError::invalid(format!("negative debit {amount}")));
        }
        if self.balance < amount {
            return Err(LedgerError::invalid(format!(
                "Insufficient balance: {} < {}",
                self.balance, amount
            )));
        }
        self.balance -= amount;
        Ok(())
    }

    /// Deposit funds.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid("balance overflow"))?;
        Ok(())
    }

    /// Make the user an employee of `office_id`.
    pub fn promote_to_employee(&mut self, office_id: String) {
        self.role = Role::Employee;
        self.office_id = Some(office_id);
    }

    /// Return an employee to the plain user role.
    pub fn demote_to_user(&mut self) {
        self.role = Role::User;
        self.office_id = None;
    }
}

/// One handling event in a shipment's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Block time, unix seconds.
    pub timestamp: u64,
    /// Handling office.
    pub office_id: String,
    /// Handling employee.
    pub employee: Address,
}

/// A postal item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Generated tracking number.
    pub track_number: TrackNumber,
    /// Accepting employee (who also paid).
    pub sender: Address,
    /// Addressee.
    pub recipient: Address,
    /// Item kind.
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    /// Delivery class.
    pub class: DeliveryClass,
    /// Absolute deadline, unix seconds.
    pub delivery_deadline: u64,
    /// Per-weight delivery cost.
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_cost: Decimal,
    /// Weight in kg, 0 < weight <= max.
    #[serde(with = "rust_decimal::serde::float")]
    pub weight: Decimal,
    /// Declared value.
    #[serde(with = "rust_decimal::serde::float")]
    pub declared_value: Decimal,
    /// Delivery cost plus declared-value fee.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    /// Origin postal address.
    pub from_address: String,
    /// Destination postal address.
    pub to_address: String,
    /// Current status.
    pub status: ShipmentStatus,
    /// Handling history, oldest first. Never empty.
    pub history: Vec<HistoryEntry>,
}

/// Parameters for creating a shipment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShipmentParams {
    /// Generated tracking number.
    pub track_number: TrackNumber,
    /// Accepting employee.
    pub sender: Address,
    /// Addressee.
    pub recipient: Address,
    /// Item kind.
    pub shipment_type: ShipmentType,
    /// Delivery class.
    pub class: DeliveryClass,
    /// Weight in kg.
    pub weight: Decimal,
    /// Declared value.
    pub declared_value: Decimal,
    /// Origin postal address.
    pub from_address: String,
    /// Destination postal address.
    pub to_address: String,
}

impl Shipment {
    /// Create a shipment in `created` status with its first history entry.
    pub fn new(
        params: ShipmentParams,
        delivery_cost: Decimal,
        total_cost: Decimal,
        delivery_deadline: u64,
        accepted_at: HistoryEntry,
    ) -> Self {
        Self {
            track_number: params.track_number,
            sender: params.sender,
            recipient: params.recipient,
            shipment_type: params.shipment_type,
            class: params.class,
            delivery_deadline,
            delivery_cost,
            weight: params.weight,
            declared_value: params.declared_value,
            total_cost,
            from_address: params.from_address,
            to_address: params.to_address,
            status: ShipmentStatus::Created,
            history: vec![accepted_at],
        }
    }

    /// Transition to new status.
    pub fn transition_to(&mut self, next: ShipmentStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::IllegalStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Append a handling event.
    pub fn record_handling(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Check if the delivery deadline has passed.
    pub fn is_past_deadline(&self, now: u64) -> bool {
        now > self.delivery_deadline
    }
}

/// An escrowed money transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyTransfer {
    /// Generated identifier.
    pub id: TransferId,
    /// Payer.
    pub sender: Address,
    /// Payee.
    pub recipient: Address,
    /// Escrowed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Resolution window in seconds.
    pub lifetime: u64,
    /// Current status.
    pub status: TransferStatus,
    /// Block time at creation, unix seconds.
    pub created_at: u64,
}

impl MoneyTransfer {
    /// Create a pending transfer.
    pub fn new(
        id: TransferId,
        sender: Address,
        recipient: Address,
        amount: Decimal,
        lifetime: u64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            sender,
            recipient,
            amount,
            lifetime,
            status: TransferStatus::Pending,
            created_at,
        }
    }

    /// Last second at which the transfer can still be resolved.
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.lifetime)
    }

    /// Transition to new status.
    pub fn transition_to(&mut self, next: TransferStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::IllegalStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
