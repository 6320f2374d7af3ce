use homefin_core::savings::{
    calculate_savings, project_savings, summarize_savings, CompoundingFrequency, SavingsPlan,
};
use homefin_core::input::parse_number;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn plan(initial: Decimal, monthly: Decimal, rate: Decimal, years: u32) -> SavingsPlan {
    SavingsPlan {
        initial_deposit: initial,
        monthly_contribution: monthly,
        annual_rate_percent: rate,
        years,
        compounding: CompoundingFrequency::Monthly,
    }
}

#[test]
fn test_ten_year_projection() {
    let p = plan(dec!(10_000), dec!(200), dec!(6), 10);
    let summary = summarize_savings(&p);
    assert_eq!(summary.points.len(), 11);
    assert_eq!(summary.final_balance.round_dp(2), dec!(50969.84));
    // 10k up front plus 200 a month for 120 months
    assert_eq!(summary.total_contributions, dec!(34_000));
    assert_eq!(summary.total_interest, summary.final_balance - dec!(34_000));
}

#[rstest]
#[case(dec!(0), 5)]
#[case(dec!(7.25), 30)]
#[case(dec!(-3), 12)]
fn test_nothing_in_nothing_out(#[case] rate: Decimal, #[case] years: u32) {
    let points = project_savings(&plan(Decimal::ZERO, Decimal::ZERO, rate, years));
    assert!(points.iter().all(|p| p.balance.is_zero()));
    assert_eq!(points.len(), years as usize + 1);
}

#[rstest]
#[case(dec!(0))]
#[case(dec!(4))]
#[case(dec!(11.5))]
fn test_balance_never_falls_with_contributions(#[case] rate: Decimal) {
    let points = project_savings(&plan(dec!(2_500), dec!(150), rate, 25));
    assert!(points.windows(2).all(|w| w[1].balance >= w[0].balance));
}

#[test]
fn test_year_zero_is_the_deposit() {
    let points = project_savings(&plan(dec!(5_000), dec!(100), dec!(5), 3));
    assert_eq!(points[0].year_index, 0);
    assert_eq!(points[0].balance, dec!(5_000));
    assert_eq!(points[0].cumulative_interest, Decimal::ZERO);
}

#[test]
fn test_annual_compounding_grows_deposit_less() {
    let mut annual = plan(dec!(10_000), Decimal::ZERO, dec!(6), 10);
    annual.compounding = CompoundingFrequency::Annually;
    let monthly = plan(dec!(10_000), Decimal::ZERO, dec!(6), 10);
    assert!(summarize_savings(&annual).final_balance < summarize_savings(&monthly).final_balance);
}

#[test]
fn test_mixed_compounding_warns() {
    let mut p = plan(dec!(1_000), dec!(50), dec!(5), 5);
    p.compounding = CompoundingFrequency::Quarterly;
    let out = calculate_savings(&p);
    assert!(out.warnings.iter().any(|w| w.contains("Quarterly")));
}

#[test]
fn test_projection_truncates_when_balance_overflows() {
    // Year 1 balance exceeds the Decimal range
    let p = plan(parse_number("5e28"), parse_number("5e27"), dec!(5), 10);
    let points = project_savings(&p);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].balance, parse_number("5e28"));

    let out = calculate_savings(&p);
    assert_eq!(out.result.final_balance, parse_number("5e28"));
    assert!(out
        .warnings
        .contains(&"Projection stops after year 0 (value out of range)".to_string()));
}

#[test]
fn test_compounding_parses_names_and_counts() {
    assert_eq!("daily".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::Daily);
    assert_eq!("4".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::Quarterly);
    assert!("weekly".parse::<CompoundingFrequency>().is_err());
}
