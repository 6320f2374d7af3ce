use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homefin_core::real_estate::{self, RentalProperty};

use crate::input;

/// Arguments for rental property returns
#[derive(Args)]
pub struct RentalArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Closing costs paid in cash
    #[arg(long, default_value = "0")]
    pub closing: Decimal,

    /// Rehab budget paid in cash
    #[arg(long, default_value = "0")]
    pub rehab: Decimal,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Other monthly income (parking, laundry)
    #[arg(long, default_value = "0")]
    pub other_income: Decimal,

    /// Vacancy in percent of gross income
    #[arg(long, default_value = "5")]
    pub vacancy: Decimal,

    /// Operating expenses in percent of effective gross income
    #[arg(long, alias = "opex")]
    pub expense_ratio: Option<Decimal>,

    /// Down payment in percent of the price
    #[arg(long, default_value = "25")]
    pub down_percent: Decimal,

    /// Annual mortgage rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,
}

pub fn run_rental(args: RentalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: RentalProperty = match input::read_structured(args.input.as_deref())? {
        Some(from_file) => from_file,
        None => RentalProperty {
            purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
            closing_costs: args.closing,
            rehab_costs: args.rehab,
            monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
            other_monthly_income: args.other_income,
            vacancy_rate_percent: args.vacancy,
            operating_expense_ratio_percent: args.expense_ratio
                .ok_or("--expense-ratio is required (or provide --input)")?,
            down_payment_percent: args.down_percent,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
        },
    };

    let result = real_estate::calculate_rental_returns(&property);
    Ok(serde_json::to_value(result)?)
}
