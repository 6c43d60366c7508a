//! In-memory State Backend
//!
//! Implements `StateBackend` over a map of storage keys to JSON records.
//! Used by the sandbox node and tests.

use crate::domain::{StateKey, StoreError};
use crate::ports::outbound::{StateBackend, WriteSet};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// In-memory key-value backend.
pub struct InMemoryStateBackend {
    /// Records keyed by rendered storage key.
    records: RwLock<HashMap<String, Value>>,
    /// When set, every call fails with `Unavailable`.
    offline: AtomicBool,
}

impl InMemoryStateBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Copy of every stored record.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.records.read().clone()
    }

    /// Raw record by storage key.
    pub fn raw(&self, storage_key: &str) -> Option<Value> {
        self.records.read().get(storage_key).cloned()
    }

    /// Overwrite a raw record, bypassing the contract.
    pub fn insert_raw(&self, storage_key: impl Into<String>, value: Value) {
        self.records.write().insert(storage_key.into(), value);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Simulate an outage for testing.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryStateBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateBackend for InMemoryStateBackend {
    async fn get(&self, key: &StateKey) -> Result<Option<Value>, StoreError> {
        self.ensure_online()?;
        Ok(self.records.read().get(&key.storage_key()).cloned())
    }

    async fn contains(&self, key: &StateKey) -> Result<bool, StoreError> {
        self.ensure_online()?;
        Ok(self.records.read().contains_key(&key.storage_key()))
    }

    async fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        self.ensure_online()?;
        let count = writes.len();
        let mut records = self.records.write();
        for (key, value) in writes {
            records.insert(key.storage_key(), value);
        }
        debug!(writes = count, "Committed write set");
        Ok(())
    }
}
