//! # Outbound Ports
//!
//! The key-value backend the contract state is persisted in. The host owns
//! durability; the contract only reads declared keys and hands back one write
//! set per successful action.

use crate::domain::{StateKey, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Writes staged by one action, committed together or not at all.
pub type WriteSet = BTreeMap<StateKey, Value>;

/// Key-value storage backend - outbound port.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Fetch the stored record, if any.
    async fn get(&self, key: &StateKey) -> Result<Option<Value>, StoreError>;

    /// Check whether a record exists.
    async fn contains(&self, key: &StateKey) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Apply every write atomically.
    async fn commit(&self, writes: WriteSet) -> Result<(), StoreError>;
}
