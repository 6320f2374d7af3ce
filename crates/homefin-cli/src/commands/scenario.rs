use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use homefin_core::scenario::{
    CalculatorInput, CalculatorOutput, JsonFileStore, Scenario, ScenarioStore,
};

use crate::config::CliConfig;
use crate::input;

/// Arguments for scenario management
#[derive(Args)]
pub struct ScenarioArgs {
    /// Scenario file (defaults to the configured store)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub action: ScenarioAction,
}

#[derive(Subcommand)]
pub enum ScenarioAction {
    /// Compute a calculator's inputs and save them under a name
    Save {
        /// Scenario name; an existing scenario with this name is replaced
        name: String,
        /// Calculator the input belongs to (auto_loan, mortgage, debt_payoff,
        /// savings, real_estate, budget). Omit when the input is already
        /// tagged with "calculator" and "data".
        #[arg(long)]
        calculator: Option<String>,
        /// Path to JSON or YAML input file (or pipe it on stdin)
        #[arg(long)]
        input: Option<String>,
    },
    /// Show a saved scenario
    Load {
        name: String,
        /// Recompute results from the saved inputs and compare
        #[arg(long)]
        recompute: bool,
    },
    /// List saved scenario names
    List,
    /// Delete a saved scenario
    Delete { name: String },
}

#[derive(Serialize)]
struct Recomputed<'a> {
    name: &'a str,
    saved_results: &'a CalculatorOutput,
    recomputed_results: CalculatorOutput,
    matches_saved: bool,
}

fn read_calculator_input(
    calculator: Option<&str>,
    path: Option<&str>,
) -> Result<CalculatorInput, Box<dyn std::error::Error>> {
    let raw: Value = input::read_structured(path)?
        .ok_or("--input is required (or pipe the input on stdin)")?;
    let tagged = match calculator {
        Some(kind) => json!({ "calculator": kind, "data": raw }),
        None => raw,
    };
    Ok(serde_json::from_value(tagged)?)
}

pub fn run_scenario(
    args: ScenarioArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let path = args.store.unwrap_or_else(|| config.scenario_store.clone());
    let mut store = JsonFileStore::new(path);

    match args.action {
        ScenarioAction::Save {
            name,
            calculator,
            input,
        } => {
            let inputs = read_calculator_input(calculator.as_deref(), input.as_deref())?;
            let scenario = Scenario::capture(name, inputs);
            store.put(&scenario)?;
            Ok(serde_json::to_value(&scenario)?)
        }
        ScenarioAction::Load { name, recompute } => {
            let scenario = store
                .get(&name)?
                .ok_or_else(|| format!("No scenario named '{}' in {}", name, store.path().display()))?;
            if !recompute {
                return Ok(serde_json::to_value(&scenario)?);
            }
            let recomputed_results = scenario.recompute();
            let report = Recomputed {
                name: &scenario.name,
                matches_saved: recomputed_results == scenario.results,
                saved_results: &scenario.results,
                recomputed_results,
            };
            Ok(serde_json::to_value(report)?)
        }
        ScenarioAction::List => Ok(serde_json::to_value(store.list()?)?),
        ScenarioAction::Delete { name } => {
            let removed = store.remove(&name)?;
            Ok(json!({ "name": name, "removed": removed }))
        }
    }
}
