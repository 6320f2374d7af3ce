mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::auto_loan::AutoLoanArgs;
use commands::budget::BudgetArgs;
use commands::debt::DebtPayoffArgs;
use commands::mortgage::MortgageArgs;
use commands::real_estate::RentalArgs;
use commands::regions::RegionsArgs;
use commands::savings::SavingsArgs;
use commands::scenario::ScenarioArgs;
use config::CliConfig;

/// Household finance calculations
#[derive(Parser)]
#[command(
    name = "hfc",
    version,
    about = "Household finance calculations",
    long_about = "A CLI for everyday personal-finance math with decimal precision: \
                  loan and mortgage payments, debt payoff horizons, savings growth, \
                  rental property returns and budget allocation. Calculations can be \
                  saved as named scenarios and reopened later."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the configured format, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Log calculation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment on a vehicle loan
    AutoLoan(AutoLoanArgs),
    /// Fully loaded monthly mortgage payment (P&I, tax, insurance, PMI/MIP)
    Mortgage(MortgageArgs),
    /// Payoff horizon for a set of debts (avalanche or snowball)
    DebtPayoff(DebtPayoffArgs),
    /// Compound growth of a lump sum plus monthly contributions
    Savings(SavingsArgs),
    /// Rental property returns (NOI, cap rate, cash-on-cash, DSCR)
    Rental(RentalArgs),
    /// Compare spending with the 50/30/20 rule
    Budget(BudgetArgs),
    /// Default property tax and insurance by state or territory
    Regions(RegionsArgs),
    /// Save, load, list and delete named scenarios
    Scenario(ScenarioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "hfc=debug,homefin_core=debug"
    } else {
        "hfc=warn,homefin_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: invalid configuration: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let format = cli.output.or(config.output).unwrap_or(OutputFormat::Json);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::AutoLoan(args) => commands::auto_loan::run_auto_loan(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &config),
        Commands::DebtPayoff(args) => commands::debt::run_debt_payoff(args),
        Commands::Savings(args) => commands::savings::run_savings(args),
        Commands::Rental(args) => commands::real_estate::run_rental(args),
        Commands::Budget(args) => commands::budget::run_budget(args),
        Commands::Regions(args) => commands::regions::run_regions(args),
        Commands::Scenario(args) => commands::scenario::run_scenario(args, &config),
        Commands::Version => {
            println!("hfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
