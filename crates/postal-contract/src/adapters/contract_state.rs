//! # Contract State
//!
//! Per-action view over the backend. Every key an action touches is pulled in
//! by `preload` first; typed accessors then read the snapshot (or the action's
//! own staged writes) and stage new values. Nothing reaches the backend until
//! the dispatcher commits `into_write_set()`.

use crate::domain::{
    invariant_office_binding, Address, CounterKey, LedgerError, MoneyTransfer, Shipment,
    StateKey, StoreError, TrackNumber, TransferId, User,
};
use crate::ports::outbound::{StateBackend, WriteSet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Staged view of contract state for one action.
#[derive(Debug, Default)]
pub struct ContractState {
    /// Preloaded records; `None` marks a declared key with no record.
    loaded: HashMap<StateKey, Option<Value>>,
    /// Writes staged by the running action.
    staged: WriteSet,
}

impl ContractState {
    /// Empty view with nothing preloaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull every key from the backend. Keys already loaded are skipped.
    pub async fn preload<B, I>(&mut self, backend: &B, keys: I) -> Result<(), LedgerError>
    where
        B: StateBackend + ?Sized,
        I: IntoIterator<Item = StateKey>,
    {
        for key in keys {
            if self.is_preloaded(&key) {
                continue;
            }
            let value = backend.get(&key).await?;
            self.loaded.insert(key, value);
        }
        Ok(())
    }

    /// Check whether a key was declared.
    pub fn is_preloaded(&self, key: &StateKey) -> bool {
        self.loaded.contains_key(key)
    }

    /// Number of writes staged so far.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Hand the staged writes to the committer.
    pub fn into_write_set(self) -> WriteSet {
        self.staged
    }

    fn raw(&self, key: &StateKey) -> Result<Option<&Value>, LedgerError> {
        let loaded = self
            .loaded
            .get(key)
            .ok_or_else(|| LedgerError::KeyNotPreloaded(key.clone()))?;
        Ok(self.staged.get(key).or(loaded.as_ref()))
    }

    fn read<T: DeserializeOwned>(&self, key: &StateKey) -> Result<Option<T>, LedgerError> {
        match self.raw(key)? {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| corrupted(key, e)),
            None => Ok(None),
        }
    }

    fn stage<T: Serialize>(&mut self, key: StateKey, record: &T) -> Result<(), LedgerError> {
        if !self.is_preloaded(&key) {
            return Err(LedgerError::KeyNotPreloaded(key));
        }
        let value = serde_json::to_value(record).map_err(|e| corrupted(&key, e))?;
        self.staged.insert(key, value);
        Ok(())
    }

    /// Check whether a record exists.
    pub fn contains(&self, key: &StateKey) -> Result<bool, LedgerError> {
        Ok(self.raw(key)?.is_some())
    }

    /// Read a counter, if seeded.
    pub fn try_counter(&self, counter: CounterKey) -> Result<Option<u64>, LedgerError> {
        self.read(&StateKey::Counter(counter))
    }

    /// Read a counter. Fails with `NotFound` before genesis.
    pub fn counter(&self, counter: CounterKey) -> Result<u64, LedgerError> {
        self.try_counter(counter)?
            .ok_or_else(|| LedgerError::NotFound(format!("counter {}", counter.as_str())))
    }

    /// Stage a counter value.
    pub fn set_counter(&mut self, counter: CounterKey, value: u64) -> Result<(), LedgerError> {
        self.stage(StateKey::Counter(counter), &value)
    }

    /// Read a user record, if any.
    pub fn try_user(&self, address: &Address) -> Result<Option<User>, LedgerError> {
        self.read(&StateKey::User(address.clone()))
    }

    /// Read a user record.
    pub fn user(&self, address: &Address) -> Result<User, LedgerError> {
        self.try_user(address)?
            .ok_or_else(|| LedgerError::NotFound(format!("user {address}")))
    }

    /// Stage a user record.
    pub fn set_user(&mut self, user: &User) -> Result<(), LedgerError> {
        invariant_office_binding(user)?;
        self.stage(StateKey::User(user.address.clone()), user)
    }

    /// Read a shipment, if any.
    pub fn try_shipment(&self, track: &TrackNumber) -> Result<Option<Shipment>, LedgerError> {
        self.read(&StateKey::Shipment(track.clone()))
    }

    /// Read a shipment.
    pub fn shipment(&self, track: &TrackNumber) -> Result<Shipment, LedgerError> {
        self.try_shipment(track)?
            .ok_or_else(|| LedgerError::NotFound(format!("shipment {track}")))
    }

    /// Stage a shipment.
    pub fn set_shipment(&mut self, shipment: &Shipment) -> Result<(), LedgerError> {
        self.stage(StateKey::Shipment(shipment.track_number.clone()), shipment)
    }

    /// Read a transfer, if any.
    pub fn try_transfer(&self, id: &TransferId) -> Result<Option<MoneyTransfer>, LedgerError> {
        self.read(&StateKey::Transfer(id.clone()))
    }

    /// Read a transfer.
    pub fn transfer(&self, id: &TransferId) -> Result<MoneyTransfer, LedgerError> {
        self.try_transfer(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("transfer {id}")))
    }

    /// Stage a transfer.
    pub fn set_transfer(&mut self, transfer: &MoneyTransfer) -> Result<(), LedgerError> {
        self.stage(StateKey::Transfer(transfer.id.clone()), transfer)
    }
}

fn corrupted(key: &StateKey, err: serde_json::Error) -> LedgerError {
    StoreError::Corrupted {
        key: key.storage_key(),
        reason: err.to_string(),
    }
    .into()
}
