//! # Domain Module
//!
//! Entities, value objects, state keys, authorization rules and errors of the
//! postal ledger.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod keys;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use keys::*;
pub use value_objects::*;
