//! # Domain Value Objects
//!
//! Identifiers, roles and the status enums driving the shipment and transfer
//! state machines.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Verified sender identity (node address).
    Address
);

string_id!(
    /// Shipment tracking number.
    TrackNumber
);

string_id!(
    /// Money transfer identifier.
    TransferId
);

/// User role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Plain user.
    #[default]
    User,
    /// Post office employee, bound to an office.
    Employee,
    /// Administrator.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Employee => "employee",
            Self::Admin => "admin",
        })
    }
}

/// Kind of postal item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentType {
    /// Letter.
    Letter,
    /// Parcel.
    Parcel,
    /// Package.
    Package,
}

impl ShipmentType {
    /// Parse the wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "letter" => Some(Self::Letter),
            "parcel" => Some(Self::Parcel),
            "package" => Some(Self::Package),
            _ => None,
        }
    }
}

/// Delivery class. Class 1 is the fastest and costliest tier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeliveryClass {
    /// Class 1.
    First,
    /// Class 2.
    Second,
    /// Class 3, used when the caller names no class.
    #[default]
    Third,
}

impl DeliveryClass {
    /// All classes, fastest first.
    pub const ALL: [DeliveryClass; 3] = [Self::First, Self::Second, Self::Third];

    /// Numeric class as used on the wire.
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

impl TryFrom<u8> for DeliveryClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(format!("delivery class must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<DeliveryClass> for u8 {
    fn from(class: DeliveryClass) -> Self {
        class.number()
    }
}

/// Shipment state machine.
///
/// ```text
/// created ──transit──> in_transit ──deliver──> delivered
///    │                     │
///    └──────refuse─────────┴──────> refused
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Accepted at the origin office.
    #[default]
    Created,
    /// Handled by at least one office after creation.
    InTransit,
    /// Handed to the recipient.
    Delivered,
    /// Refused by the recipient or an admin.
    Refused,
}

impl ShipmentStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        match (self, next) {
            (Self::Created, Self::InTransit) => true,
            (Self::InTransit, Self::InTransit) => true, // further handling
            (Self::InTransit, Self::Delivered) => true,
            (Self::Created, Self::Refused) => true,
            (Self::InTransit, Self::Refused) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Refused)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Refused => "refused",
        })
    }
}

/// Money transfer state machine. Pending is the only non-terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Escrowed, awaiting resolution.
    #[default]
    Pending,
    /// Paid out to the recipient.
    Accepted,
    /// Refused by the recipient.
    Refused,
    /// Returned to the sender.
    Cancelled,
}

impl TransferStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: TransferStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Refused)
                | (Self::Pending, Self::Cancelled)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::Cancelled => "cancelled",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"employee\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_delivery_class_numeric_wire_format() {
        assert_eq!(serde_json::to_string(&DeliveryClass::Second).unwrap(), "2");
        let class: DeliveryClass = serde_json::from_str("1").unwrap();
        assert_eq!(class, DeliveryClass::First);
        assert!(serde_json::from_str::<DeliveryClass>("4").is_err());
    }

    #[test]
    fn test_delivery_class_defaults_to_third() {
        assert_eq!(DeliveryClass::default(), DeliveryClass::Third);
    }

    #[test]
    fn test_shipment_status_forward_path() {
        assert!(ShipmentStatus::Created.can_transition_to(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::Delivered));
    }

    #[test]
    fn test_shipment_status_no_shortcut_to_delivered() {
        assert!(!ShipmentStatus::Created.can_transition_to(ShipmentStatus::Delivered));
    }

    #[test]
    fn test_shipment_status_terminal() {
        for terminal in [ShipmentStatus::Delivered, ShipmentStatus::Refused] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(ShipmentStatus::InTransit));
            assert!(!terminal.can_transition_to(ShipmentStatus::Refused));
        }
    }

    #[test]
    fn test_shipment_status_wire_name() {
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
    }

    #[test]
    fn test_transfer_status_resolves_once() {
        for outcome in [
            TransferStatus::Accepted,
            TransferStatus::Refused,
            TransferStatus::Cancelled,
        ] {
            assert!(TransferStatus::Pending.can_transition_to(outcome));
            assert!(outcome.is_terminal());
            assert!(!outcome.can_transition_to(TransferStatus::Accepted));
        }
    }

    #[test]
    fn test_shipment_type_parse() {
        assert_eq!(ShipmentType::parse("parcel"), Some(ShipmentType::Parcel));
        assert_eq!(ShipmentType::parse("crate"), None);
    }

    #[test]
    fn test_address_transparent() {
        let addr = Address::from("3Nxyz");
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"3Nxyz\"");
        assert_eq!(addr.to_string(), "3Nxyz");
    }
}
