//! Money rounding and display.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are carried as `rust_decimal::Decimal` at full precision and only
//! rounded at the display boundary.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for monetary values.
pub const DISPLAY_SCALE: u32 = 2;

/// Rounds an amount to two decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = round_money(amount);
    if rounded.is_zero() {
        // -0.00 reads as a loss in the history view
        rounded = Decimal::ZERO;
    }
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
