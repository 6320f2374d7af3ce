use homefin_core::mortgage::{
    calculate_mortgage, compose_mortgage, mortgage_insurance_monthly, region_defaults, LoanType,
    MortgageInput, REGIONS,
};
use homefin_core::HomeFinanceError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn twenty_percent_down() -> MortgageInput {
    MortgageInput {
        home_price: dec!(400_000),
        down_payment: dec!(80_000),
        annual_rate_percent: dec!(6.8),
        term_years: 30,
        property_tax_rate_percent: dec!(1.2),
        insurance_annual: dec!(1_800),
        loan_type: LoanType::Conventional,
        gross_monthly_income: Some(dec!(12_000)),
        net_monthly_income: Some(dec!(9_000)),
    }
}

// ===========================================================================
// Cost composition
// ===========================================================================

#[test]
fn test_end_to_end_twenty_percent_down() {
    let out = compose_mortgage(&twenty_percent_down()).unwrap();
    assert_eq!(out.loan_amount, dec!(320_000));
    assert_eq!(out.loan_to_value, dec!(0.8));

    let b = &out.breakdown;
    assert_eq!(b.principal_and_interest.round_dp(2), dec!(2086.16));
    // 400k * 1.2% / 12
    assert_eq!(b.property_tax_monthly, dec!(400));
    assert_eq!(b.insurance_monthly, dec!(150));
    // Exactly 80% LTV carries no PMI
    assert_eq!(b.mortgage_insurance_monthly, Decimal::ZERO);
    assert_eq!(
        b.total_monthly,
        b.principal_and_interest + b.property_tax_monthly + b.insurance_monthly
    );
}

#[test]
fn test_affordability_ratios() {
    let out = compose_mortgage(&twenty_percent_down()).unwrap();
    let total = out.breakdown.total_monthly;
    assert_eq!(out.payment_to_gross_percent, total / dec!(12_000) * dec!(100));
    assert_eq!(out.payment_to_net_percent, total / dec!(9_000) * dec!(100));

    let mut no_income = twenty_percent_down();
    no_income.gross_monthly_income = None;
    no_income.net_monthly_income = Some(Decimal::ZERO);
    let out = compose_mortgage(&no_income).unwrap();
    assert_eq!(out.payment_to_gross_percent, Decimal::ZERO);
    assert_eq!(out.payment_to_net_percent, Decimal::ZERO);
}

#[rstest]
#[case(LoanType::Conventional, dec!(0.9), dec!(210))]
#[case(LoanType::Conventional, dec!(0.8), dec!(0))]
#[case(LoanType::Fha, dec!(0.8), dec!(255))]
#[case(LoanType::Jumbo, dec!(0.95), dec!(0))]
fn test_mortgage_insurance_rules(
    #[case] loan_type: LoanType,
    #[case] ltv: Decimal,
    #[case] expected: Decimal,
) {
    assert_eq!(mortgage_insurance_monthly(loan_type, dec!(360_000), ltv), expected);
}

#[test]
fn test_pmi_warning_below_twenty_percent_down() {
    let mut input = twenty_percent_down();
    input.down_payment = dec!(40_000);
    let out = calculate_mortgage(&input);
    assert!(out.result.unwrap().breakdown.mortgage_insurance_monthly > Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.starts_with("Mortgage insurance applies")));
}

#[test]
fn test_down_payment_covers_price_is_not_ready() {
    let mut input = twenty_percent_down();
    input.down_payment = input.home_price;
    let out = calculate_mortgage(&input);
    assert!(out.result.is_none());
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Regional defaults
// ===========================================================================

#[test]
fn test_region_table_covers_states_and_territories() {
    assert_eq!(REGIONS.len(), 56);
    assert!(region_defaults("tx").is_some());
    assert!(region_defaults(" PR ").is_some());
    assert!(region_defaults("ZZ").is_none());
}

#[test]
fn test_apply_region_overwrites_tax_and_insurance() {
    let mut input = twenty_percent_down();
    let region = input.apply_region("nj").unwrap();
    assert_eq!(region.code, "NJ");
    assert_eq!(input.property_tax_rate_percent, region.property_tax_rate_percent);
    assert_eq!(input.insurance_annual, region.insurance_annual);

    let err = input.apply_region("XX").unwrap_err();
    assert!(matches!(err, HomeFinanceError::UnknownRegion(code) if code == "XX"));
}
