//! # Postal Contract
//!
//! Deterministic transition engine for a postal-and-payments ledger.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Apply signed actions one at a time to a shared key-value store:
//! - User registration and role administration (user, employee, admin)
//! - Shipment acceptance, pricing, handling and delivery
//! - Escrowed money transfers with a lifetime window
//!
//! Each action either fully applies or leaves no trace.
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | All-or-nothing | Writes staged in `ContractState`, committed once |
//! | Declared access | Undeclared keys fail with `KeyNotPreloaded` |
//! | No negative balances | Debits checked before staging |
//! | Single resolution | Transfers leave `pending` exactly once |
//!
//! ## Module Structure
//!
//! ```text
//! postal-contract/
//! ├── domain/          # User, Shipment, MoneyTransfer, keys, rules, errors
//! ├── algorithms/      # Pricing, tracking numbers, transfer ids
//! ├── actions/         # Action catalogue and handlers
//! ├── ports/           # PostalContractApi, StateBackend
//! ├── adapters/        # ContractState, InMemoryStateBackend
//! └── service.rs       # Dispatcher
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use actions::{Action, ActionContext, NewShipment};
pub use adapters::{ContractState, InMemoryStateBackend};
pub use algorithms::{quote, track_number, transfer_id, DeliveryQuote};
pub use domain::{
    Address, ConfigError, ContractConfig, CounterKey, DeliveryClass, ErrorKind, GenesisConfig,
    GenesisUser, HistoryEntry, LedgerError, MoneyTransfer, Role, Shipment, ShipmentStatus,
    ShipmentType, StateKey, StoreError, TariffTable, TrackNumber, TransferId, TransferStatus,
    User,
};
pub use events::{ActionOutcome, ActionRequest, DataEntry, ParamValue};
pub use ports::{PostalContractApi, StateBackend, WriteSet};
pub use service::{PostalContractService, ServiceStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
