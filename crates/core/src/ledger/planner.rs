//! Planning a new or edited transaction against the current holding.
//!
//! A plan says whether the candidate can be applied and, if so, which
//! derived values it will be stored with. Plans are pure: nothing is
//! written until the service persists a feasible plan.

use rust_decimal::Decimal;
use serde::Serialize;
use sharedesk_shared::types::ShareId;

use super::error::LedgerError;
use super::fold::{fold_ledger, replay};
use super::holding::HoldingState;
use super::types::{LedgerKey, ShareRecord, ShareTransaction, TradeCandidate, TradeType};
use super::validation::validate_candidate;

/// Why a candidate cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanRejection {
    /// The sell asks for more units than are held.
    InsufficientHolding,
}

/// A later sell that an edit would leave without enough units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoldingConflict {
    /// The stored sell that would be oversold.
    pub transaction_id: ShareId,
    /// Units held just before that sell.
    pub available_quantity: i64,
    /// Units that sell asks for.
    pub requested_quantity: i64,
}

/// Outcome of planning one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradePlan {
    /// The candidate that was planned.
    pub candidate: TradeCandidate,
    /// Units held before the candidate.
    pub available_quantity: i64,
    /// Average cost before the candidate.
    pub average_cost_before: Decimal,
    /// Average price the candidate will be stored with.
    pub average_price: Decimal,
    /// Realized profit/loss the candidate will be stored with.
    pub profit_loss: Decimal,
    /// Holding after the candidate.
    pub position: i64,
    /// Whether the candidate can be applied.
    pub feasible: bool,
    /// Set when `feasible` is false.
    pub reason: Option<PlanRejection>,
    /// Set when an edit would oversell a later stored transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<HoldingConflict>,
}

impl TradePlan {
    /// Converts an infeasible plan into the matching error.
    pub fn ensure_feasible(self) -> Result<Self, LedgerError> {
        match self.reason {
            Some(PlanRejection::InsufficientHolding) => {
                let (available, requested) = self.conflict.map_or(
                    (self.available_quantity, self.candidate.quantity),
                    |c| (c.available_quantity, c.requested_quantity),
                );
                Err(LedgerError::InsufficientHolding {
                    available,
                    requested,
                })
            }
            None => Ok(self),
        }
    }

    /// Builds the record to persist for this plan.
    #[must_use]
    pub const fn to_record(&self, key: LedgerKey) -> ShareRecord {
        ShareRecord {
            user_id: key.user_id,
            script_id: key.script_id,
            trade_type: self.candidate.trade_type,
            quantity: self.candidate.quantity,
            price: self.candidate.price,
            average_price: self.average_price,
            profit_loss: self.profit_loss,
            position: self.position,
        }
    }
}

/// Plans a validated candidate against a holding.
///
/// Fails with [`TransactionValidationError::AmountOverflow`] when the
/// resulting cost basis or profit/loss cannot be represented.
///
/// [`TransactionValidationError::AmountOverflow`]: super::validation::TransactionValidationError::AmountOverflow
pub fn plan_against(
    holding: HoldingState,
    candidate: TradeCandidate,
) -> Result<TradePlan, LedgerError> {
    let average_cost_before = holding.average_cost();

    if candidate.trade_type == TradeType::Sell && !holding.covers(candidate.quantity) {
        return Ok(TradePlan {
            candidate,
            available_quantity: holding.quantity,
            average_cost_before,
            average_price: average_cost_before,
            profit_loss: Decimal::ZERO,
            position: holding.quantity,
            feasible: false,
            reason: Some(PlanRejection::InsufficientHolding),
            conflict: None,
        });
    }

    let mut next = holding;
    let applied = next.apply(candidate.trade_type, candidate.quantity, candidate.price)?;
    Ok(TradePlan {
        candidate,
        available_quantity: holding.quantity,
        average_cost_before,
        average_price: applied.average_price,
        profit_loss: applied.profit_loss,
        position: applied.position,
        feasible: true,
        reason: None,
        conflict: None,
    })
}

/// Plans a new transaction appended after the existing history.
pub fn plan_new_transaction(
    history: &[ShareTransaction],
    candidate: &TradeCandidate,
) -> Result<TradePlan, LedgerError> {
    validate_candidate(candidate)?;
    let state = fold_ledger(history)?;
    plan_against(state.holding, *candidate)
}

/// Plans an edit of `editing` against the history without that transaction.
///
/// The edited transaction is re-applied as if it happened now, after every
/// other transaction of the ledger. The edited row keeps its creation time
/// in storage, so the ledger is also refolded with the edit in place: an
/// edit that leaves a later stored sell without enough units is infeasible.
/// Sells that were already oversold before the edit do not block it.
pub fn plan_transaction_update(
    history: &[ShareTransaction],
    editing: ShareId,
    candidate: &TradeCandidate,
) -> Result<TradePlan, LedgerError> {
    validate_candidate(candidate)?;
    let Some(edited) = history.iter().find(|t| t.id == editing) else {
        return Err(LedgerError::TransactionNotFound(editing));
    };
    let mut remaining: Vec<ShareTransaction> = history
        .iter()
        .filter(|t| t.id != editing)
        .cloned()
        .collect();
    let mut plan = plan_new_transaction(&remaining, candidate)?;
    if !plan.feasible {
        return Ok(plan);
    }

    let before = replay(history)?;
    remaining.push(ShareTransaction {
        trade_type: candidate.trade_type,
        quantity: candidate.quantity,
        price: candidate.price,
        ..edited.clone()
    });
    let after = replay(&remaining)?;
    if !after.has_oversell() {
        return Ok(plan);
    }

    let already_oversold = |id: ShareId| {
        before
            .rows
            .iter()
            .any(|row| row.transaction_id == id && row.oversold)
    };
    let mut available = 0;
    for row in &after.rows {
        if row.oversold && !already_oversold(row.transaction_id) {
            plan.feasible = false;
            plan.reason = Some(PlanRejection::InsufficientHolding);
            plan.conflict = Some(HoldingConflict {
                transaction_id: row.transaction_id,
                available_quantity: available,
                requested_quantity: row.quantity,
            });
            break;
        }
        available = row.position;
    }
    Ok(plan)
}
