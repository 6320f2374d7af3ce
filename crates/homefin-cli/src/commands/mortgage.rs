use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use homefin_core::mortgage::{self, LoanType, MortgageInput, RegionDefaults};

use crate::config::CliConfig;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Conventional,
    Fha,
    Jumbo,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Conventional => LoanType::Conventional,
            LoanTypeArg::Fha => LoanType::Fha,
            LoanTypeArg::Jumbo => LoanType::Jumbo,
        }
    }
}

/// Arguments for a mortgage payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MortgageArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment amount
    #[arg(long, conflicts_with = "down_percent")]
    pub down: Option<Decimal>,

    /// Down payment as a percent of the price (20 = 20%)
    #[arg(long)]
    pub down_percent: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Annual property tax in percent of the price
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Annual homeowners insurance premium
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Loan program
    #[arg(long, value_enum, default_value = "conventional")]
    pub loan_type: LoanTypeArg,

    /// Two-letter state code for default tax and insurance
    #[arg(long)]
    pub region: Option<String>,

    /// Gross monthly household income
    #[arg(long)]
    pub gross_income: Option<Decimal>,

    /// Take-home monthly income
    #[arg(long)]
    pub net_income: Option<Decimal>,
}

pub fn run_mortgage(
    args: MortgageArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = match input::read_structured::<MortgageInput>(args.input.as_deref())? {
        Some(mut from_file) => {
            // An explicit --region still overrides what the file says
            if let Some(ref code) = args.region {
                let region: &RegionDefaults = from_file.apply_region(code)?;
                debug!(region = region.code, "region applied over file input");
            }
            from_file
        }
        None => from_flags(&args, config)?,
    };

    let result = mortgage::calculate_mortgage(&mortgage_input);
    Ok(serde_json::to_value(result)?)
}

fn from_flags(
    args: &MortgageArgs,
    config: &CliConfig,
) -> Result<MortgageInput, Box<dyn std::error::Error>> {
    let home_price = args.price.ok_or("--price is required (or provide --input)")?;
    let down_payment = match (args.down, args.down_percent) {
        (Some(amount), _) => amount,
        (None, Some(percent)) => home_price * percent / Decimal::ONE_HUNDRED,
        (None, None) => return Err("--down or --down-percent is required (or provide --input)".into()),
    };

    let mut mortgage_input = MortgageInput {
        home_price,
        down_payment,
        annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_years: args.years,
        property_tax_rate_percent: args.tax_rate.unwrap_or_default(),
        insurance_annual: args.insurance.unwrap_or_default(),
        loan_type: args.loan_type.into(),
        gross_monthly_income: args.gross_income,
        net_monthly_income: args.net_income,
    };

    // Flag region wins; the configured region only fills in what is missing
    let region = match (&args.region, args.tax_rate, args.insurance) {
        (Some(code), _, _) => Some(code.clone()),
        (None, Some(_), Some(_)) => None,
        (None, _, _) => config.region.clone(),
    };

    match region {
        Some(code) => {
            mortgage_input.apply_region(&code)?;
            if args.region.is_none() {
                if let Some(tax) = args.tax_rate {
                    mortgage_input.property_tax_rate_percent = tax;
                }
                if let Some(insurance) = args.insurance {
                    mortgage_input.insurance_annual = insurance;
                }
            }
        }
        None if args.tax_rate.is_none() || args.insurance.is_none() => {
            return Err("--tax-rate and --insurance are required (or provide --region)".into());
        }
        None => {}
    }

    Ok(mortgage_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homefin_core::mortgage::region_defaults;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn args() -> MortgageArgs {
        MortgageArgs {
            input: None,
            price: Some(dec!(400000)),
            down: None,
            down_percent: Some(dec!(20)),
            rate: Some(dec!(6.5)),
            years: 30,
            tax_rate: None,
            insurance: None,
            loan_type: LoanTypeArg::Conventional,
            region: None,
            gross_income: None,
            net_income: None,
        }
    }

    fn config(region: Option<&str>) -> CliConfig {
        CliConfig {
            output: None,
            scenario_store: PathBuf::from("hfc-scenarios.json"),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn test_down_percent_of_price() {
        let mut a = args();
        a.tax_rate = Some(dec!(1));
        a.insurance = Some(dec!(1200));
        let input = from_flags(&a, &config(None)).unwrap();
        assert_eq!(input.down_payment, dec!(80000));
    }

    #[test]
    fn test_region_flag_overrides_explicit_figures() {
        let tx = region_defaults("TX").unwrap();
        let mut a = args();
        a.region = Some("tx".into());
        a.tax_rate = Some(dec!(0.5));
        a.insurance = Some(dec!(900));
        let input = from_flags(&a, &config(Some("CA"))).unwrap();
        assert_eq!(input.property_tax_rate_percent, tx.property_tax_rate_percent);
        assert_eq!(input.insurance_annual, tx.insurance_annual);
    }

    #[test]
    fn test_configured_region_fills_only_missing_figures() {
        let tx = region_defaults("TX").unwrap();
        let mut a = args();
        a.tax_rate = Some(dec!(0.5));
        let input = from_flags(&a, &config(Some("TX"))).unwrap();
        assert_eq!(input.property_tax_rate_percent, dec!(0.5));
        assert_eq!(input.insurance_annual, tx.insurance_annual);
    }

    #[test]
    fn test_explicit_figures_ignore_configured_region() {
        let mut a = args();
        a.tax_rate = Some(dec!(0.5));
        a.insurance = Some(dec!(900));
        let input = from_flags(&a, &config(Some("ZZ"))).unwrap();
        assert_eq!(input.property_tax_rate_percent, dec!(0.5));
        assert_eq!(input.insurance_annual, dec!(900));
    }

    #[test]
    fn test_missing_figures_without_region() {
        let err = from_flags(&args(), &config(None)).unwrap_err();
        assert!(err.to_string().contains("--tax-rate and --insurance"));
    }

    #[test]
    fn test_unknown_region_is_an_error() {
        let mut a = args();
        a.region = Some("ZZ".into());
        assert!(from_flags(&a, &config(None)).is_err());
    }
}
