//! Property-based tests for folding ledgers.
//!
//! - Buys only: average cost equals the quantity-weighted average price
//! - Folding is deterministic and independent of input order
//! - Positions follow the running sum of quantities

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::fold::fold_ledger;
use super::fold::test_support::tx;
use super::types::{ShareTransaction, TradeType};

/// Strategy to generate prices (0.01 to 10,000.00).
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate quantities.
fn quantity() -> impl Strategy<Value = i64> {
    1i64..10_000i64
}

/// Strategy to generate a buy-only history with distinct timestamps.
fn buys() -> impl Strategy<Value = Vec<ShareTransaction>> {
    prop::collection::vec((quantity(), price()), 1..30).prop_map(|trades| {
        trades
            .into_iter()
            .enumerate()
            .map(|(i, (qty, price))| {
                let i = u32::try_from(i).unwrap();
                tx(i64::from(i) + 1, TradeType::Buy, qty, price, i)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_buy_only_average_is_weighted(history in buys()) {
        let state = fold_ledger(&history).unwrap();

        let units: i64 = history.iter().map(|t| t.quantity).sum();
        let cost: Decimal = history
            .iter()
            .map(|t| Decimal::from(t.quantity) * t.price)
            .sum();

        prop_assert_eq!(state.available_quantity(), units);
        prop_assert_eq!(state.holding.total_cost, cost);
        prop_assert_eq!(state.average_cost(), cost / Decimal::from(units));
        prop_assert!(state.rows.iter().all(|r| r.profit_loss.is_zero()));
    }

    #[test]
    fn prop_fold_is_deterministic(history in buys(), seed in any::<u64>()) {
        let first = fold_ledger(&history).unwrap();
        let again = fold_ledger(&history).unwrap();
        prop_assert_eq!(&first, &again);

        // Rotating the input does not change the chronological result.
        let mut rotated = history.clone();
        let shift = usize::try_from(seed % rotated.len() as u64).unwrap();
        rotated.rotate_left(shift);
        prop_assert_eq!(first, fold_ledger(&rotated).unwrap());
    }

    #[test]
    fn prop_positions_are_running_sums(history in buys()) {
        let state = fold_ledger(&history).unwrap();
        let mut running = 0;
        for (row, t) in state.rows.iter().zip(&history) {
            running += t.quantity;
            prop_assert_eq!(row.position, running);
        }
    }
}
