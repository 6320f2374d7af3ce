use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fixed-rate, fully amortizing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: Money,
    /// Nominal annual rate as a percentage (6.5 = 6.5%)
    pub annual_rate_percent: Percent,
    /// Number of monthly payments
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
        }
    }

    /// Terms quoted in whole years, paid monthly.
    pub fn from_years(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        Self::new(principal, annual_rate_percent, term_years.saturating_mul(12))
    }

    /// A payment can only be computed for a positive balance and a non-zero term.
    pub fn is_ready(&self) -> bool {
        self.principal > Decimal::ZERO && self.term_months > 0
    }
}

/// Payment and lifetime totals for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_payment: Money,
    pub total_paid: Money,
    /// `total_paid - principal`
    pub total_interest: Money,
}

/// One month of a payoff schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance remaining after this payment
    pub balance: Money,
}

/// Auto loan inputs as entered at the dealership: price less cash down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoanInput {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

impl AutoLoanInput {
    pub fn loan_terms(&self) -> LoanTerms {
        LoanTerms::new(
            self.vehicle_price - self.down_payment,
            self.annual_rate_percent,
            self.term_months,
        )
    }
}

/// Auto loan output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoanOutput {
    pub loan_amount: Money,
    #[serde(flatten)]
    pub amortization: AmortizationResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed monthly payment and lifetime totals.
///
/// Returns `None` until the terms describe a real loan (positive principal,
/// non-zero term). A zero rate amortizes straight-line; any other rate,
/// including a negative one, goes through the annuity formula.
pub fn amortize(terms: &LoanTerms) -> Option<AmortizationResult> {
    if !terms.is_ready() {
        debug!(
            principal = %terms.principal,
            term_months = terms.term_months,
            "loan terms not ready"
        );
        return None;
    }

    let rate = monthly_rate(terms.annual_rate_percent);
    let monthly_payment = match annuity_payment(terms.principal, rate, terms.term_months) {
        Some(p) => p,
        None => {
            warn!(
                annual_rate_percent = %terms.annual_rate_percent,
                term_months = terms.term_months,
                "annuity factor out of range; no payment"
            );
            return None;
        }
    };

    // Straight-line repays exactly the principal, whatever the division left over
    let total_paid = if rate.is_zero() {
        Some(terms.principal)
    } else {
        monthly_payment.checked_mul(Decimal::from(terms.term_months))
    };
    let Some(total_paid) = total_paid else {
        warn!(
            principal = %terms.principal,
            term_months = terms.term_months,
            "lifetime total out of range; no payment"
        );
        return None;
    };
    let total_interest = total_paid - terms.principal;

    debug!(
        principal = %terms.principal,
        monthly_payment = %monthly_payment,
        "amortized loan"
    );

    Some(AmortizationResult {
        monthly_payment,
        total_paid,
        total_interest,
    })
}

/// Month-by-month payoff schedule; empty when the terms are not ready.
///
/// The last row absorbs any residual so the schedule always ends at zero.
pub fn amortization_schedule(terms: &LoanTerms) -> Vec<AmortizationRow> {
    let Some(summary) = amortize(terms) else {
        return Vec::new();
    };

    let rate = monthly_rate(terms.annual_rate_percent);
    let mut rows = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for month in 1..=terms.term_months {
        let interest = balance * rate;
        let mut principal = summary.monthly_payment - interest;
        if month == terms.term_months || principal > balance {
            principal = balance;
        }
        balance -= principal;

        rows.push(AmortizationRow {
            month,
            payment: interest + principal,
            interest,
            principal,
            balance,
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    rows
}

/// Payment on the financed part of a vehicle price.
pub fn auto_loan(input: &AutoLoanInput) -> Option<AutoLoanOutput> {
    let terms = input.loan_terms();
    amortize(&terms).map(|amortization| AutoLoanOutput {
        loan_amount: terms.principal,
        amortization,
    })
}

/// Auto loan payment with the standard computation envelope.
pub fn calculate_auto_loan(input: &AutoLoanInput) -> ComputationOutput<Option<AutoLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.down_payment > input.vehicle_price {
        warnings.push("Down payment exceeds the vehicle price".into());
    }

    let output = auto_loan(input);
    if output.is_none() {
        if input.loan_terms().is_ready() {
            warnings.push("Loan amount is too large to compute a payment".into());
        } else {
            warnings.push("Enter a price above the down payment and a term to see a payment".into());
        }
    }

    if input.annual_rate_percent.is_zero() && output.is_some() {
        warnings.push("Zero rate: payment is principal divided by term".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-rate auto loan (standard annuity payment)",
        input,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_payment() {
        let terms = LoanTerms::new(dec!(300000), dec!(6), 360);
        let result = amortize(&terms).unwrap();
        assert!((result.monthly_payment - dec!(1798.65)).abs() < dec!(0.01));
        assert_eq!(result.total_paid, result.monthly_payment * dec!(360));
        assert_eq!(result.total_interest, result.total_paid - dec!(300000));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let terms = LoanTerms::new(dec!(30000), Decimal::ZERO, 60);
        let result = amortize(&terms).unwrap();
        assert_eq!(result.monthly_payment, dec!(500));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_not_ready_without_principal_or_term() {
        assert!(amortize(&LoanTerms::new(Decimal::ZERO, dec!(5), 60)).is_none());
        assert!(amortize(&LoanTerms::new(dec!(-10), dec!(5), 60)).is_none());
        assert!(amortize(&LoanTerms::new(dec!(1000), dec!(5), 0)).is_none());
    }

    #[test]
    fn test_repeated_calls_identical() {
        let terms = LoanTerms::new(dec!(27500), dec!(7.25), 72);
        assert_eq!(amortize(&terms), amortize(&terms));
    }

    #[test]
    fn test_from_years() {
        let terms = LoanTerms::from_years(dec!(100000), dec!(5), 15);
        assert_eq!(terms.term_months, 180);
    }

    #[test]
    fn test_schedule_ends_at_zero() {
        let terms = LoanTerms::new(dec!(10000), dec!(12), 24);
        let rows = amortization_schedule(&terms);
        assert_eq!(rows.len(), 24);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);

        let principal_paid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert!((principal_paid - dec!(10000)).abs() < dec!(0.000001));

        // First month interest = 10000 * 1%
        assert_eq!(rows[0].interest, dec!(100));
    }

    #[test]
    fn test_schedule_empty_when_not_ready() {
        assert!(amortization_schedule(&LoanTerms::new(Decimal::ZERO, dec!(5), 12)).is_empty());
    }

    #[test]
    fn test_auto_loan_envelope() {
        let input = AutoLoanInput {
            vehicle_price: dec!(35000),
            down_payment: dec!(5000),
            annual_rate_percent: dec!(7),
            term_months: 72,
        };
        let out = calculate_auto_loan(&input);
        let result = out.result.unwrap();
        assert_eq!(result.loan_amount, dec!(30000));
        // 30000 at 7% over 72 months is about 511.47
        assert!((result.amortization.monthly_payment - dec!(511.47)).abs() < dec!(0.01));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_auto_loan_down_payment_covers_price() {
        let input = AutoLoanInput {
            vehicle_price: dec!(20000),
            down_payment: dec!(20000),
            annual_rate_percent: dec!(6),
            term_months: 60,
        };
        let out = calculate_auto_loan(&input);
        assert!(out.result.is_none());
        assert_eq!(out.warnings.len(), 1);
    }
}
