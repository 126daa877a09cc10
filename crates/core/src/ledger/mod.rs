//! Position ledger for share transactions.
//!
//! A ledger is the chronological buy/sell history of one user in one script.
//! This module implements:
//! - Domain types for transactions, candidates and computed rows
//! - The holding state and the single step function applied per trade
//! - Validation of quantities, prices and trade types
//! - Folding a history into per-row average cost, profit/loss and position
//! - Planning a new or edited transaction against the current holding
//! - Per-ledger write locks
//! - The service running the create, update, preview and plan flows
//! - Display formatting for history previews

pub mod error;
pub mod fold;
pub mod holding;
pub mod locks;
pub mod planner;
pub mod preview;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod fold_props;
#[cfg(test)]
mod planner_props;

pub use error::LedgerError;
pub use fold::{fold_ledger, sort_chronologically};
pub use holding::{AppliedTrade, HoldingState};
pub use locks::LedgerLocks;
pub use planner::{
    HoldingConflict, PlanRejection, TradePlan, plan_against, plan_new_transaction,
    plan_transaction_update,
};
pub use preview::{DisplayOptions, HistoryPreview, PreviewRow};
pub use service::{LedgerService, LedgerSnapshot, LedgerStore, PlannedWrite, StoreError};
pub use types::{
    LedgerKey, LedgerRow, LedgerState, ShareInput, ShareRecord, ShareTransaction, TradeCandidate,
    TradeType,
};
pub use validation::{
    TransactionValidationError, validate_candidate, validate_history, validate_trade,
};
