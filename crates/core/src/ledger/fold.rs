//! Folding a transaction history into a computed ledger.

use tracing::warn;

use super::error::LedgerError;
use super::holding::HoldingState;
use super::types::{LedgerRow, LedgerState, ShareTransaction};
use super::validation::validate_history;

/// Sorts transactions by creation time, keeping the given order for ties.
pub fn sort_chronologically(transactions: &mut [ShareTransaction]) {
    transactions.sort_by_key(|t| t.created_at);
}

/// Recomputes average cost, realized profit/loss and position for every
/// transaction of a ledger.
///
/// The input order does not matter: transactions are folded in creation
/// order. Stored derived fields are ignored. Every record is validated
/// before anything is computed, so a single bad record fails the whole fold.
pub fn fold_ledger(transactions: &[ShareTransaction]) -> Result<LedgerState, LedgerError> {
    let state = replay(transactions)?;

    let mut available = 0;
    for row in &state.rows {
        if row.oversold {
            warn!(
                transaction_id = %row.transaction_id,
                available,
                requested = row.quantity,
                "Stored sell exceeds holding, resetting position to zero"
            );
        }
        available = row.position;
    }
    Ok(state)
}

/// Folds without reporting oversold rows, for hypothetical histories.
pub(crate) fn replay(transactions: &[ShareTransaction]) -> Result<LedgerState, LedgerError> {
    validate_history(transactions)?;

    let mut ordered: Vec<&ShareTransaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.created_at);

    let mut holding = HoldingState::EMPTY;
    let mut rows = Vec::with_capacity(ordered.len());
    for t in ordered {
        let applied = holding.apply(t.trade_type, t.quantity, t.price)?;
        rows.push(LedgerRow {
            transaction_id: t.id,
            trade_type: t.trade_type,
            quantity: t.quantity,
            price: t.price,
            created_at: t.created_at,
            average_price: applied.average_price,
            profit_loss: applied.profit_loss,
            position: applied.position,
            oversold: applied.oversold,
        });
    }

    Ok(LedgerState { rows, holding })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use sharedesk_shared::types::{ScriptId, ShareId, UserId};

    use crate::ledger::types::{ShareTransaction, TradeType};

    pub(crate) fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(crate) fn tx(
        id: i64,
        trade_type: TradeType,
        quantity: i64,
        price: Decimal,
        minute: u32,
    ) -> ShareTransaction {
        ShareTransaction {
            id: ShareId::new(id),
            user_id: UserId::new(1),
            script_id: ScriptId::new(1),
            trade_type,
            quantity,
            price,
            created_at: at(minute),
            updated_at: None,
            average_price: None,
            profit_loss: None,
            position: None,
        }
    }
}
