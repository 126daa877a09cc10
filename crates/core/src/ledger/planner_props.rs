//! Property-based tests for planning.
//!
//! - With every sell gated by planning, the holding never goes negative
//! - Nothing accepted by the planner is ever flagged as oversold
//! - Planning agrees with folding the history plus the accepted candidate

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::fold::fold_ledger;
use super::fold::test_support::tx;
use super::planner::plan_new_transaction;
use super::types::{ShareTransaction, TradeCandidate, TradeType};

/// Strategy to generate prices (0.01 to 1,000.00).
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate candidate trades, sells as likely as buys.
fn candidates() -> impl Strategy<Value = Vec<TradeCandidate>> {
    let trade = (
        prop_oneof![Just(TradeType::Buy), Just(TradeType::Sell)],
        1i64..500i64,
        price(),
    )
        .prop_map(|(trade_type, quantity, price)| TradeCandidate {
            trade_type,
            quantity,
            price,
        });
    prop::collection::vec(trade, 1..40)
}

/// Replays candidates through the planner, keeping only feasible ones.
fn accept_all(candidates: &[TradeCandidate]) -> Vec<ShareTransaction> {
    let mut history = Vec::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let plan = plan_new_transaction(&history, candidate).unwrap();
        if plan.feasible {
            let i = u32::try_from(i).unwrap();
            let mut accepted = tx(
                i64::from(i) + 1,
                candidate.trade_type,
                candidate.quantity,
                candidate.price,
                i,
            );
            accepted.average_price = Some(plan.average_price);
            accepted.profit_loss = Some(plan.profit_loss);
            accepted.position = Some(plan.position);
            history.push(accepted);
        }
    }
    history
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_gated_sells_never_oversell(candidates in candidates()) {
        let history = accept_all(&candidates);
        let state = fold_ledger(&history).unwrap();

        prop_assert!(!state.has_oversell());
        prop_assert!(state.rows.iter().all(|r| r.position >= 0));
        prop_assert!(state.holding.total_cost >= Decimal::ZERO);
    }

    #[test]
    fn prop_plan_matches_refold(candidates in candidates()) {
        let history = accept_all(&candidates);
        let state = fold_ledger(&history).unwrap();

        for (row, stored) in state.rows.iter().zip(&history) {
            prop_assert_eq!(Some(row.average_price), stored.average_price);
            prop_assert_eq!(Some(row.profit_loss), stored.profit_loss);
            prop_assert_eq!(Some(row.position), stored.position);
        }
    }

    #[test]
    fn prop_infeasible_reports_available(candidates in candidates(), extra in 1i64..100i64) {
        let history = accept_all(&candidates);
        let held = fold_ledger(&history).unwrap().available_quantity();

        let oversized = TradeCandidate {
            trade_type: TradeType::Sell,
            quantity: held + extra,
            price: Decimal::ONE,
        };
        let plan = plan_new_transaction(&history, &oversized).unwrap();
        prop_assert!(!plan.feasible);
        prop_assert_eq!(plan.available_quantity, held);
    }
}
