//! Named, versioned snapshots of calculator inputs and their results.
//!
//! A snapshot stores the inputs exactly as entered together with the
//! results computed from them, so reopening it restores the form and
//! recomputing reproduces the saved figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::amortization::{auto_loan, AutoLoanInput, AutoLoanOutput};
use crate::budget::{allocate_budget, BudgetInput, BudgetSummary};
use crate::debt::{plan_debt_payoff, DebtPayoffInput, DebtPayoffPlan};
use crate::error::HomeFinanceError;
use crate::mortgage::{compose_mortgage, MortgageInput, MortgageOutput};
use crate::real_estate::{analyze_rental, RentalProperty, RentalReturnMetrics};
use crate::savings::{summarize_savings, SavingsPlan, SavingsProjection};
use crate::HomeFinanceResult;

/// Newest snapshot layout this build writes and reads.
pub const SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for any one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", content = "data", rename_all = "snake_case")]
pub enum CalculatorInput {
    AutoLoan(AutoLoanInput),
    Mortgage(MortgageInput),
    DebtPayoff(DebtPayoffInput),
    Savings(SavingsPlan),
    RealEstate(RentalProperty),
    Budget(BudgetInput),
}

/// Results for any one calculator. `None` payloads mean the inputs were not
/// ready to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", content = "data", rename_all = "snake_case")]
pub enum CalculatorOutput {
    AutoLoan(Option<AutoLoanOutput>),
    Mortgage(Option<MortgageOutput>),
    DebtPayoff(Option<DebtPayoffPlan>),
    Savings(SavingsProjection),
    RealEstate(Option<RentalReturnMetrics>),
    Budget(BudgetSummary),
}

impl CalculatorInput {
    pub fn kind(&self) -> &'static str {
        match self {
            CalculatorInput::AutoLoan(_) => "auto_loan",
            CalculatorInput::Mortgage(_) => "mortgage",
            CalculatorInput::DebtPayoff(_) => "debt_payoff",
            CalculatorInput::Savings(_) => "savings",
            CalculatorInput::RealEstate(_) => "real_estate",
            CalculatorInput::Budget(_) => "budget",
        }
    }

    /// Run the matching calculator.
    pub fn compute(&self) -> CalculatorOutput {
        match self {
            CalculatorInput::AutoLoan(i) => CalculatorOutput::AutoLoan(auto_loan(i)),
            CalculatorInput::Mortgage(i) => CalculatorOutput::Mortgage(compose_mortgage(i)),
            CalculatorInput::DebtPayoff(i) => CalculatorOutput::DebtPayoff(plan_debt_payoff(
                &i.debts,
                i.extra_payment,
                i.strategy,
            )),
            CalculatorInput::Savings(i) => CalculatorOutput::Savings(summarize_savings(i)),
            CalculatorInput::RealEstate(i) => CalculatorOutput::RealEstate(analyze_rental(i)),
            CalculatorInput::Budget(i) => {
                CalculatorOutput::Budget(allocate_budget(i.total_income, &i.lines))
            }
        }
    }
}

/// A saved calculator state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub schema_version: u32,
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub inputs: CalculatorInput,
    pub results: CalculatorOutput,
}

impl Scenario {
    /// Compute results for `inputs` and stamp the snapshot with the current
    /// schema version and time.
    pub fn capture(name: impl Into<String>, inputs: CalculatorInput) -> Self {
        let results = inputs.compute();
        Scenario {
            schema_version: SCHEMA_VERSION,
            name: name.into(),
            saved_at: Utc::now(),
            inputs,
            results,
        }
    }

    /// Results recomputed from the stored inputs.
    pub fn recompute(&self) -> CalculatorOutput {
        self.inputs.compute()
    }

    /// Decode a snapshot, refusing layouts newer than this build.
    pub fn from_value(value: serde_json::Value) -> HomeFinanceResult<Self> {
        let found = value
            .get("schema_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| HomeFinanceError::InvalidInput {
                field: "schema_version".into(),
                reason: "missing or not a whole number".into(),
            })?;
        if found > u64::from(SCHEMA_VERSION) {
            return Err(HomeFinanceError::UnsupportedSchema {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                supported: SCHEMA_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(text: &str) -> HomeFinanceResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> HomeFinanceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Key-value persistence for snapshots, keyed by scenario name.
/// Writing an existing name replaces it.
pub trait ScenarioStore {
    fn put(&mut self, scenario: &Scenario) -> HomeFinanceResult<()>;
    fn get(&self, name: &str) -> HomeFinanceResult<Option<Scenario>>;
    /// Saved names in ascending order.
    fn list(&self) -> HomeFinanceResult<Vec<String>>;
    /// Returns whether a snapshot was removed.
    fn remove(&mut self, name: &str) -> HomeFinanceResult<bool>;
}

/// Serialized snapshots held in memory, one JSON string per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for MemoryStore {
    fn put(&mut self, scenario: &Scenario) -> HomeFinanceResult<()> {
        self.entries
            .insert(scenario.name.clone(), scenario.to_json()?);
        debug!(name = %scenario.name, "stored scenario in memory");
        Ok(())
    }

    fn get(&self, name: &str) -> HomeFinanceResult<Option<Scenario>> {
        self.entries
            .get(name)
            .map(|text| Scenario::from_json(text))
            .transpose()
    }

    fn list(&self) -> HomeFinanceResult<Vec<String>> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn remove(&mut self, name: &str) -> HomeFinanceResult<bool> {
        Ok(self.entries.remove(name).is_some())
    }
}

/// All snapshots in one JSON document on disk, an object keyed by name.
///
/// Each operation reads the whole file and `put`/`remove` write it back.
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Entries stay as raw JSON so one unreadable snapshot does not hide the rest.
    fn read_all(&self) -> HomeFinanceResult<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> HomeFinanceResult<()> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl ScenarioStore for JsonFileStore {
    fn put(&mut self, scenario: &Scenario) -> HomeFinanceResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(scenario.name.clone(), serde_json::to_value(scenario)?);
        self.write_all(&entries)?;
        info!(
            name = %scenario.name,
            calculator = scenario.inputs.kind(),
            path = %self.path.display(),
            "saved scenario"
        );
        Ok(())
    }

    fn get(&self, name: &str) -> HomeFinanceResult<Option<Scenario>> {
        let Some(value) = self.read_all()?.remove(name) else {
            return Ok(None);
        };
        let scenario = Scenario::from_value(value)?;
        info!(name, path = %self.path.display(), "loaded scenario");
        Ok(Some(scenario))
    }

    fn list(&self) -> HomeFinanceResult<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }

    fn remove(&mut self, name: &str) -> HomeFinanceResult<bool> {
        let mut entries = self.read_all()?;
        let removed = entries.remove(name).is_some();
        if removed {
            self.write_all(&entries)?;
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
