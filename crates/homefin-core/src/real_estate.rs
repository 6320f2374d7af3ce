use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::{amortize, LoanTerms};
use crate::time_value::{percent_to_rate, safe_div, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Ratio};

/// DSCR below this is a lender red flag.
pub const DSCR_BAD_BELOW: Decimal = dec!(1.20);
/// DSCR at or above this is comfortable.
pub const DSCR_GOOD_FROM: Decimal = dec!(1.30);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Traffic-light classification for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Bad,
    Warn,
    Good,
}

/// An income property and its financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalProperty {
    pub purchase_price: Money,
    #[serde(default)]
    pub closing_costs: Money,
    #[serde(default)]
    pub rehab_costs: Money,
    pub monthly_rent: Money,
    #[serde(default)]
    pub other_monthly_income: Money,
    /// Share of gross income lost to vacancy (5 = 5%)
    pub vacancy_rate_percent: Percent,
    /// Operating expenses as a share of effective gross income
    pub operating_expense_ratio_percent: Percent,
    pub down_payment_percent: Percent,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

/// Annual return metrics for a rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalReturnMetrics {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub monthly_debt_service: Money,
    pub annual_debt_service: Money,
    pub gross_scheduled_income: Money,
    pub vacancy_loss: Money,
    pub effective_gross_income: Money,
    pub operating_expenses: Money,
    pub net_operating_income: Money,
    pub total_cash_invested: Money,
    /// NOI / purchase price (0.06 = 6%)
    pub cap_rate: Ratio,
    pub annual_cash_flow: Money,
    /// Annual cash flow / total cash invested (0.06 = 6%)
    pub cash_on_cash: Ratio,
    /// NOI / annual debt service
    pub dscr: Decimal,
    pub dscr_rating: Rating,
    pub cash_flow_rating: Rating,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify a debt service coverage ratio.
pub fn classify_dscr(dscr: Decimal) -> Rating {
    if dscr < DSCR_BAD_BELOW {
        Rating::Bad
    } else if dscr < DSCR_GOOD_FROM {
        Rating::Warn
    } else {
        Rating::Good
    }
}

/// Negative annual cash flow is bad; anything else is good.
pub fn classify_cash_flow(annual_cash_flow: Money) -> Rating {
    if annual_cash_flow < Decimal::ZERO {
        Rating::Bad
    } else {
        Rating::Good
    }
}

/// NOI, cap rate, cash-on-cash and DSCR for a rental.
///
/// `None` until there is a purchase price and a loan term.
pub fn analyze_rental(property: &RentalProperty) -> Option<RentalReturnMetrics> {
    if property.purchase_price <= Decimal::ZERO || property.term_years == 0 {
        return None;
    }

    let down_share = percent_to_rate(property.down_payment_percent);
    let loan_amount = property.purchase_price * (Decimal::ONE - down_share);
    let down_payment = property.purchase_price * down_share;

    // An all-cash purchase has no loan to amortize
    let monthly_debt_service = amortize(&LoanTerms::from_years(
        loan_amount,
        property.annual_rate_percent,
        property.term_years,
    ))
    .map(|a| a.monthly_payment)
    .unwrap_or(Decimal::ZERO);
    let annual_debt_service = monthly_debt_service * MONTHS_PER_YEAR;

    let gross_scheduled_income =
        (property.monthly_rent + property.other_monthly_income) * MONTHS_PER_YEAR;
    let vacancy_loss = gross_scheduled_income * percent_to_rate(property.vacancy_rate_percent);
    let effective_gross_income = gross_scheduled_income - vacancy_loss;

    let operating_expenses =
        effective_gross_income * percent_to_rate(property.operating_expense_ratio_percent);
    let net_operating_income = effective_gross_income - operating_expenses;

    let total_cash_invested = down_payment + property.closing_costs + property.rehab_costs;

    let cap_rate = safe_div(net_operating_income, property.purchase_price);
    let annual_cash_flow = net_operating_income - annual_debt_service;
    let cash_on_cash = if total_cash_invested > Decimal::ZERO {
        safe_div(annual_cash_flow, total_cash_invested)
    } else {
        Decimal::ZERO
    };
    let dscr = if annual_debt_service > Decimal::ZERO {
        safe_div(net_operating_income, annual_debt_service)
    } else {
        Decimal::ZERO
    };

    debug!(
        noi = %net_operating_income,
        dscr = %dscr,
        "analyzed rental"
    );

    Some(RentalReturnMetrics {
        loan_amount,
        down_payment,
        monthly_debt_service,
        annual_debt_service,
        gross_scheduled_income,
        vacancy_loss,
        effective_gross_income,
        operating_expenses,
        net_operating_income,
        total_cash_invested,
        cap_rate,
        annual_cash_flow,
        cash_on_cash,
        dscr,
        dscr_rating: classify_dscr(dscr),
        cash_flow_rating: classify_cash_flow(annual_cash_flow),
    })
}

/// Rental analysis with the standard computation envelope.
pub fn calculate_rental_returns(
    property: &RentalProperty,
) -> ComputationOutput<Option<RentalReturnMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let metrics = analyze_rental(property);
    match &metrics {
        None => warnings.push("Enter a purchase price and loan term to see returns".into()),
        Some(m) => {
            if m.annual_debt_service > Decimal::ZERO && m.dscr_rating == Rating::Bad {
                warnings.push(format!(
                    "DSCR of {:.2} is below {DSCR_BAD_BELOW} (lender covenant risk)",
                    m.dscr
                ));
            }
            if m.cash_flow_rating == Rating::Bad {
                warnings.push("Negative annual cash flow".into());
            }
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Rental income approach (NOI, cap rate, cash-on-cash, DSCR)",
        property,
        warnings,
        elapsed,
        metrics,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
