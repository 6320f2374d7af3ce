use homefin_core::real_estate::{
    analyze_rental, calculate_rental_returns, classify_dscr, Rating, RentalProperty,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn duplex() -> RentalProperty {
    RentalProperty {
        purchase_price: dec!(300_000),
        closing_costs: Decimal::ZERO,
        rehab_costs: Decimal::ZERO,
        monthly_rent: dec!(2_500),
        other_monthly_income: Decimal::ZERO,
        vacancy_rate_percent: dec!(5),
        operating_expense_ratio_percent: dec!(35),
        down_payment_percent: dec!(20),
        annual_rate_percent: dec!(6.5),
        term_years: 30,
    }
}

#[test]
fn test_end_to_end_rental() {
    let m = analyze_rental(&duplex()).unwrap();
    assert_eq!(m.gross_scheduled_income, dec!(30_000));
    assert_eq!(m.vacancy_loss, dec!(1_500));
    assert_eq!(m.effective_gross_income, dec!(28_500));
    assert_eq!(m.operating_expenses, dec!(9_975));
    assert_eq!(m.net_operating_income, dec!(18_525));
    // 6.175%
    assert_eq!(m.cap_rate, dec!(0.06175));
    assert_eq!(m.total_cash_invested, dec!(60_000));
}

#[test]
fn test_other_income_joins_gross() {
    let mut p = duplex();
    p.other_monthly_income = dec!(100);
    let m = analyze_rental(&p).unwrap();
    assert_eq!(m.gross_scheduled_income, dec!(31_200));
}

#[test]
fn test_bigger_down_payment_lifts_dscr() {
    let mut p = duplex();
    p.down_payment_percent = dec!(40);
    let m = analyze_rental(&p).unwrap();
    assert!(m.dscr > dec!(1.30), "dscr = {}", m.dscr);
    assert_eq!(m.dscr_rating, Rating::Good);
    assert!(calculate_rental_returns(&p).warnings.is_empty());
}

#[test]
fn test_thin_deal_is_flagged() {
    let mut p = duplex();
    p.monthly_rent = dec!(1_800);
    let out = calculate_rental_returns(&p);
    let m = out.result.unwrap();
    assert!(m.annual_cash_flow < Decimal::ZERO);
    assert_eq!(m.cash_flow_rating, Rating::Bad);
    assert!(m.cash_on_cash < Decimal::ZERO);
    assert_eq!(out.warnings.len(), 2);
}

#[rstest]
#[case(dec!(1.199999), Rating::Bad)]
#[case(dec!(1.20), Rating::Warn)]
#[case(dec!(1.299999), Rating::Warn)]
#[case(dec!(1.30), Rating::Good)]
fn test_dscr_boundaries(#[case] dscr: Decimal, #[case] expected: Rating) {
    assert_eq!(classify_dscr(dscr), expected);
}
