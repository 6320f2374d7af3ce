use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use homefin_core::debt::{self, Debt, DebtPayoffInput, PayoffStrategy, SingleDebtPayoff};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Avalanche,
    Snowball,
}

impl From<StrategyArg> for PayoffStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Avalanche => PayoffStrategy::Avalanche,
            StrategyArg::Snowball => PayoffStrategy::Snowball,
        }
    }
}

/// Arguments for a debt payoff plan
#[derive(Args)]
pub struct DebtPayoffArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// A debt as name:balance:rate:min_payment (repeatable)
    #[arg(long = "debt", value_name = "NAME:BALANCE:RATE:MIN")]
    pub debts: Vec<String>,

    /// Extra amount paid each month on top of the minimums
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Which debt to attack first
    #[arg(long, value_enum, default_value = "avalanche")]
    pub strategy: StrategyArg,

    /// Simulate each debt on its own at its minimum payment
    #[arg(long)]
    pub per_debt: bool,
}

#[derive(Debug, Serialize)]
struct PerDebtRow {
    name: String,
    #[serde(flatten)]
    payoff: Option<SingleDebtPayoff>,
}

fn parse_debt(spec: &str) -> Result<Debt, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Debt must be name:balance:rate:min_payment, got '{}'",
            spec
        )
        .into());
    }
    Ok(Debt {
        name: parts[0].to_string(),
        balance: parts[1].parse()?,
        annual_rate_percent: parts[2].parse()?,
        min_payment: parts[3].parse()?,
    })
}

pub fn run_debt_payoff(args: DebtPayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: DebtPayoffInput = match input::read_structured(args.input.as_deref())? {
        Some(from_file) => from_file,
        None => {
            if args.debts.is_empty() {
                return Err("at least one --debt is required (or provide --input)".into());
            }
            DebtPayoffInput {
                debts: args
                    .debts
                    .iter()
                    .map(|s| parse_debt(s))
                    .collect::<Result<Vec<_>, _>>()?,
                extra_payment: args.extra,
                strategy: args.strategy.into(),
            }
        }
    };

    if args.per_debt {
        let rows: Vec<PerDebtRow> = payoff_input
            .debts
            .iter()
            .map(|d| PerDebtRow {
                name: d.name.clone(),
                payoff: debt::simulate_single_debt(d.balance, d.annual_rate_percent, d.min_payment),
            })
            .collect();
        return Ok(serde_json::to_value(rows)?);
    }

    let result = debt::calculate_debt_payoff(&payoff_input);
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_debt_spec() {
        let d = parse_debt("Visa:4200.50:21.9:120").unwrap();
        assert_eq!(d.name, "Visa");
        assert_eq!(d.balance, dec!(4200.50));
        assert_eq!(d.annual_rate_percent, dec!(21.9));
        assert_eq!(d.min_payment, dec!(120));
    }

    #[test]
    fn test_parse_debt_spec_wrong_arity() {
        assert!(parse_debt("Visa:4200").is_err());
        assert!(parse_debt("Visa:lots:21.9:120").is_err());
    }
}
