//! # Contract State Keys
//!
//! Persisted key layout: four scalar counters under fixed keys and three keyed
//! collections, each entry stored under `<COLLECTION>_<id>`.

use super::value_objects::{Address, TrackNumber, TransferId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Scalar counters used for identifier synthesis and totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CounterKey {
    /// Number of admins seeded at genesis.
    AdminCount,
    /// Number of registered users.
    UserCount,
    /// Shipments created so far.
    ShipmentCount,
    /// Transfers sent so far.
    TransferCount,
}

impl CounterKey {
    /// All counters in genesis order.
    pub const ALL: [CounterKey; 4] = [
        Self::AdminCount,
        Self::UserCount,
        Self::ShipmentCount,
        Self::TransferCount,
    ];

    /// Fixed storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdminCount => "ADMIN_COUNT",
            Self::UserCount => "USER_COUNT",
            Self::ShipmentCount => "SHIPMENT_COUNT",
            Self::TransferCount => "TRANSFER_COUNT",
        }
    }
}

/// A key in contract state.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateKey {
    /// Scalar counter.
    Counter(CounterKey),
    /// `USERS` collection entry.
    User(Address),
    /// `SHIPMENTS` collection entry.
    Shipment(TrackNumber),
    /// `TRANSFERS` collection entry.
    Transfer(TransferId),
}

impl StateKey {
    /// Collection prefix for users.
    pub const USERS: &'static str = "USERS";
    /// Collection prefix for shipments.
    pub const SHIPMENTS: &'static str = "SHIPMENTS";
    /// Collection prefix for transfers.
    pub const TRANSFERS: &'static str = "TRANSFERS";

    /// Render the backend key.
    pub fn storage_key(&self) -> String {
        match self {
            Self::Counter(counter) => counter.as_str().to_string(),
            Self::User(addr) => format!("{}_{}", Self::USERS, addr),
            Self::Shipment(track) => format!("{}_{}", Self::SHIPMENTS, track),
            Self::Transfer(id) => format!("{}_{}", Self::TRANSFERS, id),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

impl From<CounterKey> for StateKey {
    fn from(counter: CounterKey) -> Self {
        Self::Counter(counter)
    }
}

/// Declared set of keys an action reads or writes.
pub type ReadSet = BTreeSet<StateKey>;
