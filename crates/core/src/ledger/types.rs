//! Ledger domain types.
//!
//! This module defines the types flowing through the position ledger: stored
//! transactions, candidates being planned, and the rows produced by a fold.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sharedesk_shared::types::{ScriptId, ShareId, UserId};

use super::holding::HoldingState;
use super::validation::TransactionValidationError;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// Adds to the holding at the trade price.
    Buy,
    /// Removes from the holding at the current average cost.
    Sell,
}

impl TradeType {
    /// Returns the wire name of the trade type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(TransactionValidationError::UnknownType(s.to_string())),
        }
    }
}

/// Identifies one ledger: a user's history in one script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script being traded.
    pub script_id: ScriptId,
}

impl LedgerKey {
    /// Creates a ledger key.
    #[must_use]
    pub const fn new(user_id: UserId, script_id: ScriptId) -> Self {
        Self { user_id, script_id }
    }
}

impl std::fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user {} / script {}", self.user_id, self.script_id)
    }
}

/// A persisted share transaction as returned by the store.
///
/// The derived fields are whatever the store holds; legacy rows may lack
/// them, and they are never trusted for computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTransaction {
    /// Store-assigned identifier.
    pub id: ShareId,
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// Buy or sell.
    pub trade_type: TradeType,
    /// Units transacted.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
    /// Ordering key for folding.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Stored average price.
    pub average_price: Option<Decimal>,
    /// Stored realized profit/loss.
    pub profit_loss: Option<Decimal>,
    /// Stored holding after this transaction.
    pub position: Option<i64>,
}

impl ShareTransaction {
    /// Returns the ledger this transaction belongs to.
    #[must_use]
    pub const fn ledger_key(&self) -> LedgerKey {
        LedgerKey::new(self.user_id, self.script_id)
    }
}

/// A trade being evaluated before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCandidate {
    /// Buy or sell.
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Units to transact.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
}

/// Input for the create and update flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInput {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Units to transact.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
}

impl ShareInput {
    /// Returns the ledger this input targets.
    #[must_use]
    pub const fn ledger_key(&self) -> LedgerKey {
        LedgerKey::new(self.user_id, self.script_id)
    }

    /// Returns the trade part of the input.
    #[must_use]
    pub const fn candidate(&self) -> TradeCandidate {
        TradeCandidate {
            trade_type: self.trade_type,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// A transaction with its derived fields computed, ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Owner of the holding.
    pub user_id: UserId,
    /// Script traded.
    pub script_id: ScriptId,
    /// Buy or sell.
    pub trade_type: TradeType,
    /// Units transacted.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
    /// Average cost attributed to this transaction.
    pub average_price: Decimal,
    /// Realized profit/loss (zero for buys).
    pub profit_loss: Decimal,
    /// Holding after this transaction.
    pub position: i64,
}

/// Computed view of one transaction inside a folded ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    /// Transaction this row was computed from.
    pub transaction_id: ShareId,
    /// Buy or sell.
    pub trade_type: TradeType,
    /// Units transacted.
    pub quantity: i64,
    /// Unit price.
    pub price: Decimal,
    /// Ordering key.
    pub created_at: DateTime<Utc>,
    /// Holding cost basis after a buy, or before a sell.
    pub average_price: Decimal,
    /// Realized profit/loss (zero for buys).
    pub profit_loss: Decimal,
    /// Holding after this transaction.
    pub position: i64,
    /// The stored history sold more than was held at this point.
    pub oversold: bool,
}

/// Result of folding a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerState {
    /// One row per transaction, in chronological order.
    pub rows: Vec<LedgerRow>,
    /// Holding after the last transaction.
    pub holding: HoldingState,
}

impl LedgerState {
    /// Quantity that can still be sold.
    #[must_use]
    pub const fn available_quantity(&self) -> i64 {
        self.holding.quantity
    }

    /// Cost basis per unit of the live holding.
    #[must_use]
    pub fn average_cost(&self) -> Decimal {
        self.holding.average_cost()
    }

    /// Sum of realized profit/loss over every sell.
    #[must_use]
    pub fn realized_profit_loss(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |total, row| total.saturating_add(row.profit_loss))
    }

    /// Returns true if any stored sell exceeded the holding of its time.
    #[must_use]
    pub fn has_oversell(&self) -> bool {
        self.rows.iter().any(|row| row.oversold)
    }
}
