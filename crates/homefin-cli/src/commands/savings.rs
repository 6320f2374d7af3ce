use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homefin_core::savings::{self, CompoundingFrequency, SavingsPlan};

use crate::input;

/// Arguments for a savings projection
#[derive(Args)]
pub struct SavingsArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Starting balance
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Amount added every month
    #[arg(long, default_value = "0")]
    pub monthly: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years to project
    #[arg(long)]
    pub years: Option<u32>,

    /// How often the starting balance compounds: annually, quarterly,
    /// monthly, daily (or 1, 4, 12, 365)
    #[arg(long, default_value = "monthly")]
    pub compounding: CompoundingFrequency,

    /// Print one row per year instead of the summary
    #[arg(long)]
    pub points: bool,
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: SavingsPlan = match input::read_structured(args.input.as_deref())? {
        Some(from_file) => from_file,
        None => SavingsPlan {
            initial_deposit: args.initial,
            monthly_contribution: args.monthly,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            compounding: args.compounding,
        },
    };

    if args.points {
        return Ok(serde_json::to_value(savings::project_savings(&plan))?);
    }

    let result = savings::calculate_savings(&plan);
    Ok(serde_json::to_value(result)?)
}
