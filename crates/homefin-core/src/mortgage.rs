use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::{amortize, AmortizationResult, LoanTerms};
use crate::error::HomeFinanceError;
use crate::time_value::{percent_to_rate, safe_div, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Ratio};
use crate::HomeFinanceResult;

/// Conventional loans carry PMI above this loan-to-value.
const PMI_LTV_THRESHOLD: Decimal = dec!(0.80);
/// Illustrative annual PMI rate on conventional loans.
const CONVENTIONAL_PMI_RATE: Decimal = dec!(0.007);
/// Illustrative annual MIP rate on FHA loans.
const FHA_MIP_RATE: Decimal = dec!(0.0085);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan program, which decides the mortgage insurance surcharge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    Conventional,
    Fha,
    Jumbo,
}

/// Inputs for a fully loaded monthly mortgage payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    /// Annual property tax as a percentage of the home price
    pub property_tax_rate_percent: Percent,
    /// Annual homeowners insurance premium
    pub insurance_annual: Money,
    #[serde(default)]
    pub loan_type: LoanType,
    /// Gross monthly household income (qualification view)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_monthly_income: Option<Money>,
    /// Take-home monthly income (affordability view)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_monthly_income: Option<Money>,
}

impl MortgageInput {
    pub fn loan_amount(&self) -> Money {
        self.home_price - self.down_payment
    }

    pub fn loan_terms(&self) -> LoanTerms {
        LoanTerms::from_years(self.loan_amount(), self.annual_rate_percent, self.term_years)
    }

    /// Loan amount over home price; zero when there is no price yet.
    pub fn loan_to_value(&self) -> Ratio {
        safe_div(self.loan_amount(), self.home_price)
    }

    /// Overwrite the tax rate and insurance premium with a state's defaults.
    pub fn apply_region(&mut self, code: &str) -> HomeFinanceResult<&'static RegionDefaults> {
        let region =
            region_defaults(code).ok_or_else(|| HomeFinanceError::UnknownRegion(code.to_string()))?;
        self.property_tax_rate_percent = region.property_tax_rate_percent;
        self.insurance_annual = region.insurance_annual;
        debug!(region = region.code, "applied regional tax and insurance defaults");
        Ok(region)
    }
}

/// The four parts of a monthly housing payment and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageCostBreakdown {
    pub principal_and_interest: Money,
    pub property_tax_monthly: Money,
    pub insurance_monthly: Money,
    pub mortgage_insurance_monthly: Money,
    pub total_monthly: Money,
}

impl MortgageCostBreakdown {
    fn new(
        principal_and_interest: Money,
        property_tax_monthly: Money,
        insurance_monthly: Money,
        mortgage_insurance_monthly: Money,
    ) -> Self {
        Self {
            principal_and_interest,
            property_tax_monthly,
            insurance_monthly,
            mortgage_insurance_monthly,
            total_monthly: principal_and_interest
                + property_tax_monthly
                + insurance_monthly
                + mortgage_insurance_monthly,
        }
    }
}

/// Complete mortgage output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub loan_amount: Money,
    pub loan_to_value: Ratio,
    pub breakdown: MortgageCostBreakdown,
    pub amortization: AmortizationResult,
    /// Total monthly payment / gross monthly income * 100
    pub payment_to_gross_percent: Percent,
    /// Total monthly payment / net monthly income * 100
    pub payment_to_net_percent: Percent,
}

/// Default property tax and insurance for a state or territory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDefaults {
    pub code: &'static str,
    pub name: &'static str,
    pub property_tax_rate_percent: Percent,
    pub insurance_annual: Money,
}

macro_rules! region {
    ($code:literal, $name:literal, $tax:literal, $ins:literal) => {
        RegionDefaults {
            code: $code,
            name: $name,
            property_tax_rate_percent: dec!($tax),
            insurance_annual: dec!($ins),
        }
    };
}

/// Effective property tax rates and typical annual homeowners premiums.
/// Illustrative figures for defaults only; users overwrite them freely.
pub static REGIONS: [RegionDefaults; 56] = [
    region!("AL", "Alabama", 0.40, 2100),
    region!("AK", "Alaska", 1.04, 1200),
    region!("AZ", "Arizona", 0.62, 1700),
    region!("AR", "Arkansas", 0.61, 2300),
    region!("CA", "California", 0.75, 1500),
    region!("CO", "Colorado", 0.51, 2600),
    region!("CT", "Connecticut", 2.15, 1800),
    region!("DE", "Delaware", 0.57, 1000),
    region!("DC", "District of Columbia", 0.57, 1300),
    region!("FL", "Florida", 0.86, 4200),
    region!("GA", "Georgia", 0.92, 1900),
    region!("HI", "Hawaii", 0.29, 1100),
    region!("ID", "Idaho", 0.63, 1000),
    region!("IL", "Illinois", 2.23, 1700),
    region!("IN", "Indiana", 0.84, 1500),
    region!("IA", "Iowa", 1.52, 1600),
    region!("KS", "Kansas", 1.41, 2900),
    region!("KY", "Kentucky", 0.83, 2200),
    region!("LA", "Louisiana", 0.56, 3300),
    region!("ME", "Maine", 1.24, 1100),
    region!("MD", "Maryland", 1.05, 1500),
    region!("MA", "Massachusetts", 1.14, 1700),
    region!("MI", "Michigan", 1.38, 1500),
    region!("MN", "Minnesota", 1.11, 2200),
    region!("MS", "Mississippi", 0.79, 2300),
    region!("MO", "Missouri", 1.01, 2200),
    region!("MT", "Montana", 0.74, 1900),
    region!("NE", "Nebraska", 1.67, 3100),
    region!("NV", "Nevada", 0.55, 1100),
    region!("NH", "New Hampshire", 1.93, 1000),
    region!("NJ", "New Jersey", 2.47, 1300),
    region!("NM", "New Mexico", 0.67, 1700),
    region!("NY", "New York", 1.73, 1600),
    region!("NC", "North Carolina", 0.82, 1800),
    region!("ND", "North Dakota", 0.98, 2000),
    region!("OH", "Ohio", 1.59, 1300),
    region!("OK", "Oklahoma", 0.90, 4400),
    region!("OR", "Oregon", 0.93, 1000),
    region!("PA", "Pennsylvania", 1.49, 1100),
    region!("RI", "Rhode Island", 1.63, 1800),
    region!("SC", "South Carolina", 0.57, 1900),
    region!("SD", "South Dakota", 1.31, 2500),
    region!("TN", "Tennessee", 0.71, 2000),
    region!("TX", "Texas", 1.80, 3400),
    region!("UT", "Utah", 0.63, 1000),
    region!("VT", "Vermont", 1.90, 900),
    region!("VA", "Virginia", 0.87, 1400),
    region!("WA", "Washington", 0.94, 1300),
    region!("WV", "West Virginia", 0.57, 1500),
    region!("WI", "Wisconsin", 1.73, 1100),
    region!("WY", "Wyoming", 0.61, 1600),
    region!("AS", "American Samoa", 0.50, 1500),
    region!("GU", "Guam", 0.28, 1800),
    region!("MP", "Northern Mariana Islands", 0.35, 1800),
    region!("PR", "Puerto Rico", 0.87, 900),
    region!("VI", "U.S. Virgin Islands", 0.49, 2400),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Look up a state or territory by its two-letter code (case-insensitive).
pub fn region_defaults(code: &str) -> Option<&'static RegionDefaults> {
    let code = code.trim();
    REGIONS.iter().find(|r| r.code.eq_ignore_ascii_case(code))
}

/// Monthly PMI/MIP surcharge for a loan program at a given loan-to-value.
pub fn mortgage_insurance_monthly(loan_type: LoanType, principal: Money, ltv: Ratio) -> Money {
    let annual_rate = match loan_type {
        LoanType::Conventional if ltv > PMI_LTV_THRESHOLD => CONVENTIONAL_PMI_RATE,
        LoanType::Conventional => Decimal::ZERO,
        LoanType::Fha => FHA_MIP_RATE,
        LoanType::Jumbo => Decimal::ZERO,
    };
    principal * annual_rate / MONTHS_PER_YEAR
}

/// Fully loaded monthly payment and affordability ratios.
///
/// `None` until there is a loan to amortize (price above down payment and a
/// non-zero term).
pub fn compose_mortgage(input: &MortgageInput) -> Option<MortgageOutput> {
    let terms = input.loan_terms();
    let amortization = amortize(&terms)?;

    let loan_amount = terms.principal;
    let loan_to_value = input.loan_to_value();

    let property_tax_monthly =
        input.home_price * percent_to_rate(input.property_tax_rate_percent) / MONTHS_PER_YEAR;
    let insurance_monthly = input.insurance_annual / MONTHS_PER_YEAR;
    let mortgage_insurance =
        mortgage_insurance_monthly(input.loan_type, loan_amount, loan_to_value);

    let breakdown = MortgageCostBreakdown::new(
        amortization.monthly_payment,
        property_tax_monthly,
        insurance_monthly,
        mortgage_insurance,
    );

    let payment_to_gross_percent = income_share(breakdown.total_monthly, input.gross_monthly_income);
    let payment_to_net_percent = income_share(breakdown.total_monthly, input.net_monthly_income);

    debug!(
        loan_amount = %loan_amount,
        total_monthly = %breakdown.total_monthly,
        "composed mortgage payment"
    );

    Some(MortgageOutput {
        loan_amount,
        loan_to_value,
        breakdown,
        amortization,
        payment_to_gross_percent,
        payment_to_net_percent,
    })
}

/// Mortgage payment with the standard computation envelope.
pub fn calculate_mortgage(input: &MortgageInput) -> ComputationOutput<Option<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = compose_mortgage(input);

    match &output {
        None => {
            warnings.push("Enter a home price above the down payment and a term to see a payment".into());
        }
        Some(out) => {
            if out.breakdown.mortgage_insurance_monthly > Decimal::ZERO {
                warnings.push(format!(
                    "Mortgage insurance applies ({:?} loan at {:.1}% LTV)",
                    input.loan_type,
                    out.loan_to_value * dec!(100)
                ));
            }
            // Common lender front-end guideline
            if out.payment_to_gross_percent > dec!(28) {
                warnings.push(format!(
                    "Housing payment is {:.1}% of gross income, above the 28% guideline",
                    out.payment_to_gross_percent
                ));
            }
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Mortgage PITI (annuity P&I + tax + insurance + PMI/MIP)",
        input,
        warnings,
        elapsed,
        output,
    )
}

fn income_share(payment: Money, income: Option<Money>) -> Percent {
    match income {
        Some(inc) if inc > Decimal::ZERO => safe_div(payment, inc) * dec!(100),
        _ => Decimal::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> MortgageInput {
        MortgageInput {
            home_price: dec!(400000),
            down_payment: dec!(80000),
            annual_rate_percent: dec!(6.8),
            term_years: 30,
            property_tax_rate_percent: dec!(1.2),
            insurance_annual: dec!(1800),
            loan_type: LoanType::Conventional,
            gross_monthly_income: Some(dec!(12000)),
            net_monthly_income: Some(dec!(9000)),
        }
    }

    #[test]
    fn test_twenty_percent_down_end_to_end() {
        let out = compose_mortgage(&sample_input()).unwrap();
        assert_eq!(out.loan_amount, dec!(320000));
        assert_eq!(out.loan_to_value, dec!(0.8));
        // 320000 at 6.8/1200 over 360 months
        assert!((out.breakdown.principal_and_interest - dec!(2086.16)).abs() < dec!(0.01));
        // 400000 * 1.2% / 12
        assert_eq!(out.breakdown.property_tax_monthly, dec!(400));
        assert_eq!(out.breakdown.insurance_monthly, dec!(150));
        // LTV exactly 80% does not trigger PMI
        assert_eq!(out.breakdown.mortgage_insurance_monthly, Decimal::ZERO);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let mut input = sample_input();
        input.down_payment = dec!(20000);
        let b = compose_mortgage(&input).unwrap().breakdown;
        assert_eq!(
            b.total_monthly,
            b.principal_and_interest
                + b.property_tax_monthly
                + b.insurance_monthly
                + b.mortgage_insurance_monthly
        );
    }

    #[test]
    fn test_conventional_pmi_above_eighty_ltv() {
        let mut input = sample_input();
        input.down_payment = dec!(40000);
        let out = compose_mortgage(&input).unwrap();
        // 360000 * 0.007 / 12
        assert_eq!(out.breakdown.mortgage_insurance_monthly, dec!(210));
    }

    #[test]
    fn test_fha_mip_regardless_of_ltv() {
        let mut input = sample_input();
        input.loan_type = LoanType::Fha;
        input.down_payment = dec!(200000);
        let out = compose_mortgage(&input).unwrap();
        // 200000 * 0.0085 / 12
        let expected = dec!(200000) * dec!(0.0085) / dec!(12);
        assert_eq!(out.breakdown.mortgage_insurance_monthly, expected);
    }

    #[test]
    fn test_jumbo_never_insured() {
        let mut input = sample_input();
        input.loan_type = LoanType::Jumbo;
        input.down_payment = dec!(10000);
        let out = compose_mortgage(&input).unwrap();
        assert_eq!(out.breakdown.mortgage_insurance_monthly, Decimal::ZERO);
    }

    #[test]
    fn test_affordability_ratios() {
        let out = compose_mortgage(&sample_input()).unwrap();
        let total = out.breakdown.total_monthly;
        assert_eq!(out.payment_to_gross_percent, total / dec!(12000) * dec!(100));
        assert_eq!(out.payment_to_net_percent, total / dec!(9000) * dec!(100));
    }

    #[test]
    fn test_affordability_guarded_without_income() {
        let mut input = sample_input();
        input.gross_monthly_income = Some(Decimal::ZERO);
        input.net_monthly_income = None;
        let out = compose_mortgage(&input).unwrap();
        assert_eq!(out.payment_to_gross_percent, Decimal::ZERO);
        assert_eq!(out.payment_to_net_percent, Decimal::ZERO);
    }

    #[test]
    fn test_not_ready_when_down_covers_price() {
        let mut input = sample_input();
        input.down_payment = input.home_price;
        assert!(compose_mortgage(&input).is_none());

        let out = calculate_mortgage(&input);
        assert!(out.result.is_none());
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_region_lookup_case_insensitive() {
        let tx = region_defaults("tx").unwrap();
        assert_eq!(tx.name, "Texas");
        assert!(region_defaults(" PR ").is_some());
        assert!(region_defaults("ZZ").is_none());
    }

    #[test]
    fn test_region_codes_unique() {
        let mut codes: Vec<&str> = REGIONS.iter().map(|r| r.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), REGIONS.len());
    }

    #[test]
    fn test_apply_region_overwrites_fields() {
        let mut input = sample_input();
        let nj = input.apply_region("NJ").unwrap();
        assert_eq!(nj.code, "NJ");
        assert_eq!(input.property_tax_rate_percent, dec!(2.47));
        assert_eq!(input.insurance_annual, dec!(1300));
    }

    #[test]
    fn test_apply_unknown_region() {
        let mut input = sample_input();
        let err = input.apply_region("XX").unwrap_err();
        assert!(matches!(err, HomeFinanceError::UnknownRegion(ref c) if c == "XX"));
        assert_eq!(input.property_tax_rate_percent, dec!(1.2));
    }

    #[test]
    fn test_pmi_warning() {
        let mut input = sample_input();
        input.down_payment = dec!(20000);
        let out = calculate_mortgage(&input);
        assert!(out.warnings.iter().any(|w| w.contains("Mortgage insurance")));
    }
}
