//! Running holding state and the per-trade step function.
//!
//! Every flow that touches a ledger (folding history, planning a create,
//! planning an update) advances the holding through [`HoldingState::apply`],
//! so the three can never disagree on the arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::TradeType;
use super::validation::TransactionValidationError;

const OVERFLOW: TransactionValidationError = TransactionValidationError::AmountOverflow;

/// Units held and their total cost basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingState {
    /// Units currently held. Never negative.
    pub quantity: i64,
    /// Cost basis of the units held.
    pub total_cost: Decimal,
}

/// Derived values for one applied trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTrade {
    /// Average cost after a buy, or before a sell.
    pub average_price: Decimal,
    /// Realized profit/loss. Zero for buys.
    pub profit_loss: Decimal,
    /// Units held after the trade.
    pub position: i64,
    /// A sell exceeded the holding and the state was reset to empty.
    pub oversold: bool,
}

impl HoldingState {
    /// Empty holding.
    pub const EMPTY: Self = Self {
        quantity: 0,
        total_cost: Decimal::ZERO,
    };

    /// Cost basis per unit, or zero when nothing is held.
    #[must_use]
    pub fn average_cost(&self) -> Decimal {
        if self.quantity > 0 {
            self.total_cost / Decimal::from(self.quantity)
        } else {
            Decimal::ZERO
        }
    }

    /// Returns true if `quantity` units can be sold from this holding.
    #[must_use]
    pub const fn covers(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Advances the holding by one trade.
    ///
    /// Callers validate `quantity` and `price` beforehand. A sell larger than
    /// the holding resets the state to empty and reports `oversold`; the
    /// planner never lets such a sell through, so this only happens while
    /// replaying stored history. On overflow the holding is left unchanged.
    pub fn apply(
        &mut self,
        trade_type: TradeType,
        quantity: i64,
        price: Decimal,
    ) -> Result<AppliedTrade, TransactionValidationError> {
        let units = Decimal::from(quantity);
        match trade_type {
            TradeType::Buy => {
                let next = Self {
                    quantity: self.quantity.checked_add(quantity).ok_or(OVERFLOW)?,
                    total_cost: units
                        .checked_mul(price)
                        .and_then(|cost| self.total_cost.checked_add(cost))
                        .ok_or(OVERFLOW)?,
                };
                *self = next;
                Ok(AppliedTrade {
                    average_price: self.average_cost(),
                    profit_loss: Decimal::ZERO,
                    position: self.quantity,
                    oversold: false,
                })
            }
            TradeType::Sell => {
                let average_before = self.average_cost();
                let profit_loss = price
                    .checked_sub(average_before)
                    .and_then(|margin| margin.checked_mul(units))
                    .ok_or(OVERFLOW)?;
                let oversold = !self.covers(quantity);
                if oversold || self.quantity == quantity {
                    *self = Self::EMPTY;
                } else {
                    let released = average_before.checked_mul(units).ok_or(OVERFLOW)?;
                    self.total_cost = self.total_cost.checked_sub(released).ok_or(OVERFLOW)?;
                    self.quantity -= quantity;
                }
                Ok(AppliedTrade {
                    average_price: average_before,
                    profit_loss,
                    position: self.quantity,
                    oversold,
                })
            }
        }
    }
}
