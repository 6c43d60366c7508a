//! # Algorithms Module
//!
//! Pure computations: delivery pricing and identifier synthesis.

pub mod identifiers;
pub mod pricing;

pub use identifiers::{track_number, transfer_id};
pub use pricing::{quote, DeliveryQuote};
