//! # Postal Contract Service
//!
//! Dispatcher that runs one action at a time against a `StateBackend`.
//!
//! ## Execution
//!
//! 1. Parse the request into an `Action`
//! 2. Preload the declared read set, then the derived keys
//! 3. Run the handler on the staged `ContractState`
//! 4. Commit the write set iff the handler succeeded and staged anything
//!
//! A failure at any step leaves the backend untouched. Concurrent callers are
//! serialized, so no two actions interleave.

use crate::actions::{Action, ActionContext};
use crate::adapters::ContractState;
use crate::domain::{
    Address, ConfigError, ContractConfig, ErrorKind, LedgerError, Shipment, StateKey,
    TrackNumber, User,
};
use crate::events::{ActionOutcome, ActionRequest};
use crate::ports::inbound::PostalContractApi;
use crate::ports::outbound::StateBackend;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the Postal Contract Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Requests received.
    pub actions_executed: u64,
    /// State transitions committed.
    pub actions_applied: u64,
    /// Queries answered.
    pub queries_served: u64,
    /// Requests that failed.
    pub actions_rejected: u64,
    /// Failures by kind.
    pub rejections_by_kind: HashMap<ErrorKind, u64>,
    /// Records written to the backend.
    pub writes_committed: u64,
}

/// The main Postal Contract Service.
pub struct PostalContractService<B: StateBackend> {
    /// Contract configuration.
    config: ContractConfig,
    /// Storage backend.
    backend: Arc<B>,
    /// Held for the whole of one action.
    turn: Mutex<()>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<B: StateBackend> PostalContractService<B> {
    /// Create a service. Fails if the configuration is unusable.
    pub fn new(backend: B, config: ContractConfig) -> Result<Self, ConfigError> {
        Self::with_shared_backend(Arc::new(backend), config)
    }

    /// Create a service over a backend shared with the caller.
    pub fn with_shared_backend(backend: Arc<B>, config: ContractConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            turn: Mutex::new(()),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Contract configuration.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Storage backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Execute one action.
    #[instrument(
        skip(self, request),
        fields(
            action = %request.action,
            sender = %request.sender,
            correlation_id = %Uuid::new_v4()
        )
    )]
    pub async fn execute(&self, request: ActionRequest) -> Result<ActionOutcome, LedgerError> {
        let _turn = self.turn.lock().await;
        let result = self.execute_internal(&request).await;

        {
            let mut stats = self.stats.write().await;
            stats.actions_executed += 1;
            match &result {
                Ok((ActionOutcome::Applied, writes)) => {
                    stats.actions_applied += 1;
                    stats.writes_committed += *writes as u64;
                }
                Ok(_) => stats.queries_served += 1,
                Err(e) => {
                    stats.actions_rejected += 1;
                    *stats.rejections_by_kind.entry(e.kind()).or_insert(0) += 1;
                }
            }
        }

        match result {
            Ok((outcome, writes)) => {
                if matches!(outcome, ActionOutcome::Applied) {
                    info!(writes, "Action applied");
                } else {
                    debug!("Query answered");
                }
                Ok(outcome)
            }
            Err(e) if e.kind() == ErrorKind::Internal => {
                error!(error = %e, "Action failed");
                Err(e)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "Action rejected");
                Err(e)
            }
        }
    }

    async fn execute_internal(
        &self,
        request: &ActionRequest,
    ) -> Result<(ActionOutcome, usize), LedgerError> {
        let action = Action::parse(request)?;
        let ctx = ActionContext::new(request, &self.config);

        let mut state = ContractState::new();
        state
            .preload(self.backend.as_ref(), action.read_set(&ctx))
            .await?;
        let derived = action.derived_keys(&ctx, &state)?;
        state.preload(self.backend.as_ref(), derived).await?;

        let outcome = action.apply(&ctx, &mut state)?;

        let writes = state.into_write_set();
        let count = writes.len();
        if count > 0 {
            self.backend.commit(writes).await?;
        }
        debug!(action = action.name(), writes = count, "Handler finished");
        Ok((outcome, count))
    }

    async fn read_one(&self, key: StateKey) -> Result<ContractState, LedgerError> {
        let mut state = ContractState::new();
        state.preload(self.backend.as_ref(), [key]).await?;
        Ok(state)
    }
}

#[async_trait]
impl<B: StateBackend> PostalContractApi for PostalContractService<B> {
    async fn execute(&self, request: ActionRequest) -> Result<ActionOutcome, LedgerError> {
        PostalContractService::execute(self, request).await
    }

    async fn user_info(&self, address: &Address) -> Result<Option<User>, LedgerError> {
        self.read_one(StateKey::User(address.clone()))
            .await?
            .try_user(address)
    }

    async fn shipment(&self, track_number: &TrackNumber) -> Result<Option<Shipment>, LedgerError> {
        self.read_one(StateKey::Shipment(track_number.clone()))
            .await?
            .try_shipment(track_number)
    }
}
