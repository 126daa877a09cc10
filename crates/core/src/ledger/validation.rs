//! Transaction validation.
//!
//! Quantities must be positive whole numbers and prices strictly positive,
//! both below fixed ceilings so that a single trade's cost always fits in a
//! `Decimal`. Every record is checked before any derived value is computed.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{ShareTransaction, TradeCandidate};

/// Largest quantity accepted for one trade.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Largest unit price accepted for one trade.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Reasons a transaction is rejected before computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionValidationError {
    /// Quantity is zero or negative.
    #[error("Quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i64),

    /// Price is zero or negative.
    #[error("Price must be greater than zero, got {0}")]
    NonPositivePrice(Decimal),

    /// Quantity is above [`MAX_QUANTITY`].
    #[error("Quantity is too large, got {0}")]
    QuantityTooLarge(i64),

    /// Price is above [`MAX_PRICE`].
    #[error("Price is too large, got {0}")]
    PriceTooLarge(Decimal),

    /// Trade type is neither buy nor sell.
    #[error("Unknown transaction type: {0:?}")]
    UnknownType(String),

    /// The running holding no longer fits the numeric range.
    #[error("Ledger amounts are too large to compute")]
    AmountOverflow,
}

/// Validates the quantity and price of a trade.
pub fn validate_trade(quantity: i64, price: Decimal) -> Result<(), TransactionValidationError> {
    if quantity <= 0 {
        return Err(TransactionValidationError::NonPositiveQuantity(quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(TransactionValidationError::QuantityTooLarge(quantity));
    }
    if price <= Decimal::ZERO {
        return Err(TransactionValidationError::NonPositivePrice(price));
    }
    if price > MAX_PRICE {
        return Err(TransactionValidationError::PriceTooLarge(price));
    }
    Ok(())
}

/// Validates a candidate trade.
pub fn validate_candidate(candidate: &TradeCandidate) -> Result<(), TransactionValidationError> {
    validate_trade(candidate.quantity, candidate.price)
}

/// Validates every stored transaction of a history.
pub fn validate_history(history: &[ShareTransaction]) -> Result<(), TransactionValidationError> {
    history
        .iter()
        .try_for_each(|t| validate_trade(t.quantity, t.price))
}
