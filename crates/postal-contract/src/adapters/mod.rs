//! # Adapters Layer (Hexagonal Architecture)
//!
//! Staged contract state and the in-memory storage backend.

mod contract_state;
mod memory_backend;

pub use contract_state::ContractState;
pub use memory_backend::InMemoryStateBackend;
