//! Guarded time-value-of-money primitives.
//!
//! Every calculator divides and raises to powers through these helpers, so
//! the zero-rate and zero-denominator branches are defined in one place.
//! A helper that cannot produce a finite answer returns `None` or zero;
//! nothing here panics on degenerate input.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// `numerator / denominator`, or zero when the quotient is undefined
/// (zero denominator) or does not fit in a `Decimal`.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// 6.5 -> 0.065
pub fn percent_to_rate(percent: Percent) -> Decimal {
    percent / HUNDRED
}

/// Periodic rate for a nominal annual percentage split into `periods_per_year`.
pub fn periodic_rate(annual_percent: Percent, periods_per_year: u32) -> Decimal {
    if periods_per_year == 0 {
        return Decimal::ZERO;
    }
    percent_to_rate(annual_percent) / Decimal::from(periods_per_year)
}

/// Monthly rate for a nominal annual percentage: `percent / 100 / 12`.
pub fn monthly_rate(annual_percent: Percent) -> Decimal {
    percent_to_rate(annual_percent) / MONTHS_PER_YEAR
}

/// Growth factor `(1 + rate)^periods` by exact integer exponentiation.
pub fn compound(rate: Decimal, periods: u64) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powu(periods)
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
///
/// `principal * r / (1 - (1 + r)^-n)`, or straight-line `principal / n` when
/// the rate is zero. `None` when `periods` is zero or the factor overflows.
pub fn annuity_payment(principal: Money, rate: Decimal, periods: u32) -> Option<Money> {
    if periods == 0 {
        return None;
    }
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return principal.checked_div(n);
    }

    let factor = compound(rate, u64::from(periods))?;
    let discount = Decimal::ONE.checked_div(factor)?;
    let denominator = Decimal::ONE - discount;
    principal.checked_mul(rate)?.checked_div(denominator)
}

/// Future value of `payment` deposited at the end of each of `periods`
/// periods: `payment * ((1 + r)^n - 1) / r`, or `payment * n` at zero rate.
pub fn annuity_future_value(payment: Money, rate: Decimal, periods: u64) -> Option<Money> {
    if rate.is_zero() {
        return payment.checked_mul(Decimal::from(periods));
    }
    let factor = compound(rate, periods)?;
    let growth = (factor - Decimal::ONE).checked_div(rate)?;
    payment.checked_mul(growth)
}

/// Future value of a single deposit: `amount * (1 + r)^n`.
pub fn lump_sum_future_value(amount: Money, rate: Decimal, periods: u64) -> Option<Money> {
    amount.checked_mul(compound(rate, periods)?)
}

/// Whether `payment` exceeds one period's interest on `balance`.
/// `None` when the interest itself does not fit in a `Decimal`.
pub fn outpaces_interest(balance: Money, rate: Decimal, payment: Money) -> Option<bool> {
    Some(payment > balance.checked_mul(rate)?)
}

/// Number of periods for a level payment to retire `balance` at `rate`:
/// `ln(pmt / (pmt - balance * r)) / ln(1 + r)`.
///
/// `None` when the payment never catches up with interest accrual
/// (`payment <= balance * rate`), when the payment is not positive, or when
/// an intermediate value leaves the `Decimal` range. Callers that report
/// the first case separately check [`outpaces_interest`] beforehand.
pub fn periods_to_repay(balance: Money, rate: Decimal, payment: Money) -> Option<Decimal> {
    if payment <= Decimal::ZERO {
        return None;
    }
    if rate.is_zero() {
        return balance.checked_div(payment);
    }

    let accrual = balance.checked_mul(rate)?;
    if payment <= accrual {
        return None;
    }

    let numerator = payment
        .checked_div(payment.checked_sub(accrual)?)?
        .checked_ln()?;
    let denominator = (Decimal::ONE + rate).checked_ln()?;
    numerator.checked_div(denominator)
}
