use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::HomeFinanceError;
use crate::time_value::{
    annuity_future_value, lump_sum_future_value, monthly_rate, periodic_rate, MONTHS_PER_YEAR,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often the initial deposit compounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }

    pub fn from_periods(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(CompoundingFrequency::Annually),
            4 => Some(CompoundingFrequency::Quarterly),
            12 => Some(CompoundingFrequency::Monthly),
            365 => Some(CompoundingFrequency::Daily),
            _ => None,
        }
    }
}

impl FromStr for CompoundingFrequency {
    type Err = HomeFinanceError;

    /// Accepts a name (`monthly`) or a period count (`12`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(periods) = s.parse::<u32>() {
            if let Some(freq) = Self::from_periods(periods) {
                return Ok(freq);
            }
        }
        match s.to_ascii_lowercase().as_str() {
            "annually" | "annual" | "yearly" => Ok(CompoundingFrequency::Annually),
            "quarterly" => Ok(CompoundingFrequency::Quarterly),
            "monthly" => Ok(CompoundingFrequency::Monthly),
            "daily" => Ok(CompoundingFrequency::Daily),
            _ => Err(HomeFinanceError::InvalidInput {
                field: "compounding".into(),
                reason: format!("'{s}' is not one of annually, quarterly, monthly, daily (1, 4, 12, 365)"),
            }),
        }
    }
}

/// A savings or investment plan: lump sum plus monthly deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPlan {
    #[serde(default)]
    pub initial_deposit: Money,
    #[serde(default)]
    pub monthly_contribution: Money,
    pub annual_rate_percent: Percent,
    pub years: u32,
    /// Applies to the initial deposit only; contributions always compound monthly.
    #[serde(default)]
    pub compounding: CompoundingFrequency,
}

/// Balance and its split at the end of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjectionPoint {
    pub year_index: u32,
    pub balance: Money,
    pub cumulative_contributions: Money,
    /// `balance - cumulative_contributions`
    pub cumulative_interest: Money,
}

/// Year-by-year projection with end-of-horizon totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub final_balance: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    /// One point per year, year 0 included
    pub points: Vec<SavingsProjectionPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Balance after `year` whole years.
///
/// The initial deposit compounds at the plan's frequency; the monthly
/// contributions always compound monthly, independently of it. `None` only
/// when the balance leaves the `Decimal` range.
pub fn balance_at_year(plan: &SavingsPlan, year: u32) -> Option<Money> {
    let periods_per_year = plan.compounding.periods_per_year();
    let deposit_rate = periodic_rate(plan.annual_rate_percent, periods_per_year);
    let deposit_periods = u64::from(periods_per_year) * u64::from(year);
    let deposit = lump_sum_future_value(plan.initial_deposit, deposit_rate, deposit_periods)?;

    let contribution_months = u64::from(year) * 12;
    let contributions = annuity_future_value(
        plan.monthly_contribution,
        monthly_rate(plan.annual_rate_percent),
        contribution_months,
    )?;

    deposit.checked_add(contributions)
}

/// Amount paid in by the end of `year`, or `None` when it overflows.
pub fn contributions_at_year(plan: &SavingsPlan, year: u32) -> Option<Money> {
    let months = MONTHS_PER_YEAR * Decimal::from(year);
    plan.initial_deposit.checked_add(plan.monthly_contribution.checked_mul(months)?)
}

/// One point per year from 0 to `plan.years` inclusive.
///
/// Recomputed from the plan on every call. If a value overflows the series
/// ends at the last representable year.
pub fn project_savings(plan: &SavingsPlan) -> Vec<SavingsProjectionPoint> {
    let mut points = Vec::with_capacity(plan.years as usize + 1);

    for year_index in 0..=plan.years {
        let Some(point) = projection_point(plan, year_index) else {
            warn!(year_index, "savings balance overflowed; projection truncated");
            break;
        };
        points.push(point);
    }

    points
}

fn projection_point(plan: &SavingsPlan, year_index: u32) -> Option<SavingsProjectionPoint> {
    let balance = balance_at_year(plan, year_index)?;
    let cumulative_contributions = contributions_at_year(plan, year_index)?;
    Some(SavingsProjectionPoint {
        year_index,
        balance,
        cumulative_contributions,
        cumulative_interest: balance.checked_sub(cumulative_contributions)?,
    })
}

/// Projection plus end-of-horizon totals.
pub fn summarize_savings(plan: &SavingsPlan) -> SavingsProjection {
    let points = project_savings(plan);
    let (final_balance, total_contributions, total_interest) = points
        .last()
        .map(|p| (p.balance, p.cumulative_contributions, p.cumulative_interest))
        .unwrap_or((plan.initial_deposit, plan.initial_deposit, Decimal::ZERO));

    debug!(
        years = plan.years,
        final_balance = %final_balance,
        "projected savings"
    );

    SavingsProjection {
        final_balance,
        total_contributions,
        total_interest,
        points,
    }
}

/// Savings projection with the standard computation envelope.
pub fn calculate_savings(plan: &SavingsPlan) -> ComputationOutput<SavingsProjection> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if plan.initial_deposit.is_zero() && plan.monthly_contribution.is_zero() {
        warnings.push("Enter a starting amount or a monthly contribution".into());
    }
    if plan.compounding != CompoundingFrequency::Monthly && !plan.monthly_contribution.is_zero() {
        warnings.push(format!(
            "Initial deposit compounds {:?}; monthly contributions compound monthly",
            plan.compounding
        ));
    }

    let projection = summarize_savings(plan);
    if projection.points.len() != plan.years as usize + 1 {
        warnings.push(format!(
            "Projection stops after year {} (value out of range)",
            projection.points.len().saturating_sub(1)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Compound growth: lump sum at chosen frequency + monthly annuity",
        plan,
        warnings,
        elapsed,
        projection,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
