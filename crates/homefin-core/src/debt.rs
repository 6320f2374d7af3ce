use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::time_value::{
    monthly_rate, outpaces_interest, periods_to_repay, safe_div, MONTHS_PER_YEAR,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

/// Month-by-month simulation stops here (50 years).
pub const MAX_SIMULATION_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single debt as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub balance: Money,
    pub annual_rate_percent: Percent,
    pub min_payment: Money,
}

impl Debt {
    /// Debts with no balance or no rate are incomplete and sit out the plan.
    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO && self.annual_rate_percent > Decimal::ZERO
    }
}

/// Which debt to attack first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Highest rate first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffInput {
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default)]
    pub strategy: PayoffStrategy,
}

/// Whether the combined payment outruns interest accrual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffHorizon {
    PaysOff {
        months: Decimal,
        total_interest_paid: Money,
    },
    /// Payment is at or below monthly interest; there is no payoff date.
    BalanceGrows,
}

/// Aggregate payoff plan for a set of debts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffPlan {
    pub total_balance: Money,
    pub weighted_average_rate_percent: Percent,
    pub total_monthly_payment: Money,
    pub horizon: PayoffHorizon,
    /// Participating debts in strategy order
    pub ordered_debts: Vec<Debt>,
}

impl DebtPayoffPlan {
    pub fn months_to_payoff(&self) -> Option<Decimal> {
        match self.horizon {
            PayoffHorizon::PaysOff { months, .. } => Some(months),
            PayoffHorizon::BalanceGrows => None,
        }
    }

    pub fn total_interest_paid(&self) -> Option<Money> {
        match self.horizon {
            PayoffHorizon::PaysOff {
                total_interest_paid,
                ..
            } => Some(total_interest_paid),
            PayoffHorizon::BalanceGrows => None,
        }
    }
}

/// Result of paying one balance down month by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleDebtPayoff {
    pub months: u32,
    pub years: Decimal,
    pub total_interest: Money,
    /// True when the simulation hit the month cap with a balance left
    pub capped: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sort debts for display: avalanche by rate descending, snowball by
/// balance ascending. Ties keep their input order.
pub fn order_debts(debts: &[Debt], strategy: PayoffStrategy) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    match strategy {
        PayoffStrategy::Avalanche => {
            ordered.sort_by(|a, b| b.annual_rate_percent.cmp(&a.annual_rate_percent))
        }
        PayoffStrategy::Snowball => ordered.sort_by(|a, b| a.balance.cmp(&b.balance)),
    }
    ordered
}

/// Total balance, balance-weighted rate and combined payment, or `None`
/// when a sum or product overflows.
fn aggregate(active: &[Debt], extra_payment: Money) -> Option<(Money, Percent, Money)> {
    let mut total_balance = Decimal::ZERO;
    let mut weighted_sum = Decimal::ZERO;
    let mut total_minimums = Decimal::ZERO;
    for d in active {
        total_balance = total_balance.checked_add(d.balance)?;
        weighted_sum = weighted_sum.checked_add(d.balance.checked_mul(d.annual_rate_percent)?)?;
        total_minimums = total_minimums.checked_add(d.min_payment)?;
    }
    Some((
        total_balance,
        safe_div(weighted_sum, total_balance),
        total_minimums.checked_add(extra_payment)?,
    ))
}

/// Aggregate payoff plan.
///
/// All participating debts are collapsed into one balance at the
/// balance-weighted average rate, paid with the sum of minimums plus
/// `extra_payment`. The strategy only orders `ordered_debts`; it does not
/// change the horizon. Returns `None` when no debt has both a balance and
/// a rate, or when the totals or the horizon leave the `Decimal` range.
pub fn plan_debt_payoff(
    debts: &[Debt],
    extra_payment: Money,
    strategy: PayoffStrategy,
) -> Option<DebtPayoffPlan> {
    let active: Vec<Debt> = debts.iter().filter(|d| d.is_active()).cloned().collect();
    if active.is_empty() {
        debug!(entered = debts.len(), "no complete debts to plan");
        return None;
    }

    let Some(totals) = aggregate(&active, extra_payment) else {
        warn!(entered = debts.len(), "debt totals out of range");
        return None;
    };
    let (total_balance, weighted_average_rate_percent, total_monthly_payment) = totals;

    let rate = monthly_rate(weighted_average_rate_percent);
    let horizon = match outpaces_interest(total_balance, rate, total_monthly_payment) {
        Some(false) => {
            warn!(
                total_balance = %total_balance,
                total_monthly_payment = %total_monthly_payment,
                "payment does not cover monthly interest"
            );
            PayoffHorizon::BalanceGrows
        }
        Some(true) => {
            let paid_off = periods_to_repay(total_balance, rate, total_monthly_payment)
                .and_then(|months| {
                    let total_interest_paid = total_monthly_payment
                        .checked_mul(months)?
                        .checked_sub(total_balance)?;
                    Some(PayoffHorizon::PaysOff {
                        months,
                        total_interest_paid,
                    })
                });
            match paid_off {
                Some(horizon) => horizon,
                None => {
                    warn!(total_balance = %total_balance, "payoff horizon out of range");
                    return None;
                }
            }
        }
        None => {
            warn!(total_balance = %total_balance, "monthly interest out of range");
            return None;
        }
    };

    Some(DebtPayoffPlan {
        total_balance,
        weighted_average_rate_percent,
        total_monthly_payment,
        horizon,
        ordered_debts: order_debts(&active, strategy),
    })
}

/// Debt payoff plan with the standard computation envelope.
pub fn calculate_debt_payoff(input: &DebtPayoffInput) -> ComputationOutput<Option<DebtPayoffPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let skipped = input.debts.iter().filter(|d| !d.is_active()).count();
    if skipped > 0 {
        warnings.push(format!(
            "{skipped} debt(s) without a balance or rate were left out"
        ));
    }

    let plan = plan_debt_payoff(&input.debts, input.extra_payment, input.strategy);
    match &plan {
        None if skipped < input.debts.len() => {
            warnings.push("Debt totals are too large to compute a payoff".into())
        }
        None => warnings.push("Add at least one debt with a balance and a rate".into()),
        Some(p) if p.horizon == PayoffHorizon::BalanceGrows => warnings.push(
            "Balance grows: payments do not cover monthly interest, no payoff date".into(),
        ),
        Some(_) => {}
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Aggregate payoff at balance-weighted average rate (NPER)",
        input,
        warnings,
        elapsed,
        plan,
    )
}

/// Pay a single balance down month by month.
///
/// Each month accrues interest on the remaining balance and applies the
/// rest of the payment to principal; the final month may overpay. Stops at
/// [`MAX_SIMULATION_MONTHS`]. Returns `None` when there is nothing to pay,
/// the payment does not exceed the first month's interest, or the interest
/// leaves the `Decimal` range.
pub fn simulate_single_debt(
    balance: Money,
    annual_rate_percent: Percent,
    payment: Money,
) -> Option<SingleDebtPayoff> {
    let rate = monthly_rate(annual_rate_percent);
    if balance <= Decimal::ZERO || payment <= Decimal::ZERO {
        return None;
    }
    if !outpaces_interest(balance, rate, payment)? {
        return None;
    }

    let mut remaining = balance;
    let mut months = 0u32;
    let mut total_interest = Decimal::ZERO;

    while remaining > Decimal::ZERO && months < MAX_SIMULATION_MONTHS {
        let interest = remaining.checked_mul(rate)?;
        remaining = remaining.checked_sub(payment.checked_sub(interest)?)?;
        total_interest = total_interest.checked_add(interest)?;
        months += 1;
    }

    Some(SingleDebtPayoff {
        months,
        years: Decimal::from(months) / MONTHS_PER_YEAR,
        total_interest,
        capped: remaining > Decimal::ZERO,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
