use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homefin_core::amortization::{self, AutoLoanInput};

use crate::input;

/// Arguments for an auto loan payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AutoLoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cash down and trade-in
    #[arg(long, default_value = "0")]
    pub down: Decimal,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Print the month-by-month schedule instead of the summary
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_auto_loan(args: AutoLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: AutoLoanInput = match input::read_structured(args.input.as_deref())? {
        Some(loan) => loan,
        None => AutoLoanInput {
            vehicle_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
        },
    };

    if args.schedule {
        let rows = amortization::amortization_schedule(&loan.loan_terms());
        return Ok(serde_json::to_value(rows)?);
    }

    let result = amortization::calculate_auto_loan(&loan);
    Ok(serde_json::to_value(result)?)
}
