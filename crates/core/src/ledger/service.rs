//! Ledger service for the create, update, preview and plan flows.
//!
//! This module turns the pure calculator into the flows the API exposes.
//! Persistence is reached only through the [`LedgerStore`] collaborator, so
//! the service has no HTTP dependency.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sharedesk_shared::types::ShareId;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::error::LedgerError;
use super::fold::{fold_ledger, sort_chronologically};
use super::locks::LedgerLocks;
use super::planner::{TradePlan, plan_new_transaction, plan_transaction_update};
use super::types::{LedgerKey, LedgerState, ShareInput, ShareRecord, ShareTransaction, TradeCandidate};
use super::validation::{TransactionValidationError, validate_candidate};

/// Failures reported by a [`LedgerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The access token was refused.
    #[error("unauthorized")]
    Unauthorized,

    /// The store refused the request.
    #[error("rejected ({status}): {message}")]
    Rejected {
        /// Status reported by the store.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// A stored record carries an invalid trade.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] TransactionValidationError),

    /// The store answered with something that could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Persistence collaborator for share transactions.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns every transaction of a ledger, in no particular order.
    async fn fetch_transactions_by_ledger(
        &self,
        key: LedgerKey,
    ) -> Result<Vec<ShareTransaction>, StoreError>;

    /// Persists a new transaction and returns it with its assigned id.
    async fn create_transaction(&self, record: &ShareRecord)
    -> Result<ShareTransaction, StoreError>;

    /// Replaces an existing transaction.
    async fn update_transaction(
        &self,
        id: ShareId,
        record: &ShareRecord,
    ) -> Result<ShareTransaction, StoreError>;
}

/// A persisted transaction together with the plan it was written from.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedWrite {
    /// The transaction as returned by the store.
    pub transaction: ShareTransaction,
    /// The plan that produced its derived fields.
    pub plan: TradePlan,
}

/// Stored history of a ledger and its recomputation.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// Ledger the snapshot belongs to.
    pub key: LedgerKey,
    /// Stored transactions in chronological order.
    pub transactions: Vec<ShareTransaction>,
    /// Recomputed ledger.
    pub state: LedgerState,
}

/// Runs ledger flows against a store.
///
/// Cloning is cheap; clones share the same lock registry.
#[derive(Debug, Clone, Default)]
pub struct LedgerService {
    locks: Arc<LedgerLocks>,
}

impl LedgerService {
    /// Creates a service with its own lock registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service sharing an existing lock registry.
    #[must_use]
    pub const fn with_locks(locks: Arc<LedgerLocks>) -> Self {
        Self { locks }
    }

    /// Returns the lock registry.
    #[must_use]
    pub fn locks(&self) -> &LedgerLocks {
        &self.locks
    }

    /// Records a new transaction.
    ///
    /// The ledger stays locked from fetching the history until the store
    /// answers, so a concurrent write cannot plan from the same holding.
    /// The write is attempted once.
    pub async fn create<S>(&self, store: &S, input: &ShareInput) -> Result<PlannedWrite, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        let result = self.create_locked(store, input).await;
        self.locks.prune_if_crowded();
        result
    }

    /// Rewrites an existing transaction.
    ///
    /// The edited transaction is planned against the rest of its ledger as
    /// if it happened now. The edit is refused if it would leave a later
    /// stored sell without enough units.
    pub async fn update<S>(
        &self,
        store: &S,
        id: ShareId,
        input: &ShareInput,
    ) -> Result<PlannedWrite, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        let result = self.update_locked(store, id, input).await;
        self.locks.prune_if_crowded();
        result
    }

    async fn create_locked<S>(
        &self,
        store: &S,
        input: &ShareInput,
    ) -> Result<PlannedWrite, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        let candidate = input.candidate();
        validate_candidate(&candidate)?;
        let key = input.ledger_key();

        let _guard = self.locks.acquire(key).await;
        let history = store.fetch_transactions_by_ledger(key).await?;
        let plan = plan_new_transaction(&history, &candidate)
            .and_then(TradePlan::ensure_feasible)
            .inspect_err(|e| log_rejection(key, e))?;

        let transaction = store.create_transaction(&plan.to_record(key)).await?;
        info!(
            transaction_id = %transaction.id,
            user_id = %key.user_id,
            script_id = %key.script_id,
            trade_type = %candidate.trade_type,
            position = plan.position,
            "Share transaction created"
        );
        Ok(PlannedWrite { transaction, plan })
    }

    async fn update_locked<S>(
        &self,
        store: &S,
        id: ShareId,
        input: &ShareInput,
    ) -> Result<PlannedWrite, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        let candidate = input.candidate();
        validate_candidate(&candidate)?;
        let key = input.ledger_key();

        let _guard = self.locks.acquire(key).await;
        let history = store.fetch_transactions_by_ledger(key).await?;
        let plan = plan_transaction_update(&history, id, &candidate)
            .and_then(TradePlan::ensure_feasible)
            .inspect_err(|e| log_rejection(key, e))?;

        let transaction = store
            .update_transaction(id, &plan.to_record(key))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => LedgerError::TransactionNotFound(id),
                other => other.into(),
            })?;
        info!(
            transaction_id = %id,
            user_id = %key.user_id,
            script_id = %key.script_id,
            position = plan.position,
            "Share transaction updated"
        );
        Ok(PlannedWrite { transaction, plan })
    }

    /// Fetches and recomputes a ledger without writing anything.
    pub async fn preview<S>(&self, store: &S, key: LedgerKey) -> Result<LedgerSnapshot, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        let mut transactions = store.fetch_transactions_by_ledger(key).await?;
        sort_chronologically(&mut transactions);
        let state = fold_ledger(&transactions)?;
        debug!(
            user_id = %key.user_id,
            script_id = %key.script_id,
            rows = state.rows.len(),
            "Ledger recomputed"
        );
        Ok(LedgerSnapshot {
            key,
            transactions,
            state,
        })
    }

    /// Plans a candidate against the current ledger without writing.
    ///
    /// With `excluding` set, plans an edit of that transaction. Infeasible
    /// sells come back as a plan with `feasible == false`.
    pub async fn plan<S>(
        &self,
        store: &S,
        key: LedgerKey,
        candidate: &TradeCandidate,
        excluding: Option<ShareId>,
    ) -> Result<TradePlan, LedgerError>
    where
        S: LedgerStore + ?Sized,
    {
        validate_candidate(candidate)?;
        let history = store.fetch_transactions_by_ledger(key).await?;
        match excluding {
            Some(id) => plan_transaction_update(&history, id, candidate),
            None => plan_new_transaction(&history, candidate),
        }
    }
}

fn log_rejection(key: LedgerKey, err: &LedgerError) {
    warn!(
        user_id = %key.user_id,
        script_id = %key.script_id,
        error = %err,
        "Share transaction rejected"
    );
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
