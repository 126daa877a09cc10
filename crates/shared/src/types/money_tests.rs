use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[rstest]
#[case(dec!(150), "150.00")]
#[case(dec!(33.333333), "33.33")]
#[case(dec!(2.675), "2.68")]
#[case(dec!(-2.675), "-2.68")]
#[case(dec!(0.004), "0.00")]
#[case(dec!(-0.004), "0.00")]
fn test_format_money(#[case] amount: Decimal, #[case] expected: &str) {
    assert_eq!(format_money(amount), expected);
}

#[test]
fn test_round_money_keeps_exact_values() {
    assert_eq!(round_money(dec!(12.5)), dec!(12.5));
    assert_eq!(round_money(dec!(12.345)), dec!(12.35));
}
