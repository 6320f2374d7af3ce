use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use homefin_core::{amortization, budget, debt, input, mortgage, real_estate, savings, scenario};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Decode `input_json`, run `calculate`, encode the result.
fn with_json<I, O>(input_json: &str, calculate: impl FnOnce(&I) -> O) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    serde_json::to_string(&calculate(&input)).map_err(to_napi_error)
}

fn parse_decimal(field: &str, text: &str) -> NapiResult<Decimal> {
    text.trim()
        .parse()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn auto_loan(input_json: String) -> NapiResult<String> {
    with_json(&input_json, amortization::calculate_auto_loan)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    with_json(&input_json, amortization::amortization_schedule)
}

#[napi]
pub fn mortgage_payment(input_json: String) -> NapiResult<String> {
    with_json(&input_json, mortgage::calculate_mortgage)
}

/// Mortgage payment after filling tax and insurance from a state code.
#[napi]
pub fn mortgage_payment_for_region(input_json: String, region: String) -> NapiResult<String> {
    let mut input: mortgage::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.apply_region(&region).map_err(to_napi_error)?;
    serde_json::to_string(&mortgage::calculate_mortgage(&input)).map_err(to_napi_error)
}

#[napi]
pub fn regions() -> NapiResult<String> {
    serde_json::to_string(&mortgage::REGIONS[..]).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Debt, savings, rentals, budget
// ---------------------------------------------------------------------------

#[napi]
pub fn debt_payoff(input_json: String) -> NapiResult<String> {
    with_json(&input_json, debt::calculate_debt_payoff)
}

#[napi]
pub fn single_debt_payoff(balance: String, annual_rate_percent: String, payment: String) -> NapiResult<String> {
    let result = debt::simulate_single_debt(
        parse_decimal("balance", &balance)?,
        parse_decimal("annual_rate_percent", &annual_rate_percent)?,
        parse_decimal("payment", &payment)?,
    );
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn savings_projection(input_json: String) -> NapiResult<String> {
    with_json(&input_json, savings::calculate_savings)
}

#[napi]
pub fn rental_returns(input_json: String) -> NapiResult<String> {
    with_json(&input_json, real_estate::calculate_rental_returns)
}

#[napi]
pub fn budget_summary(input_json: String) -> NapiResult<String> {
    with_json(&input_json, budget::calculate_budget)
}

#[napi]
pub fn split_income(
    income: String,
    needs_percent: String,
    wants_percent: String,
    savings_percent: String,
) -> NapiResult<String> {
    let split = budget::split_income(
        parse_decimal("income", &income)?,
        parse_decimal("needs_percent", &needs_percent)?,
        parse_decimal("wants_percent", &wants_percent)?,
        parse_decimal("savings_percent", &savings_percent)?,
    );
    serde_json::to_string(&split).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// Snapshot JSON for a tagged calculator input. The host keeps the string
/// in its own key-value storage.
#[napi]
pub fn capture_scenario(name: String, input_json: String) -> NapiResult<String> {
    let inputs: scenario::CalculatorInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    scenario::Scenario::capture(name, inputs)
        .to_json()
        .map_err(to_napi_error)
}

/// Validate a stored snapshot and return it with freshly computed results.
#[napi]
pub fn reopen_scenario(scenario_json: String) -> NapiResult<String> {
    let mut snapshot = scenario::Scenario::from_json(&scenario_json).map_err(to_napi_error)?;
    snapshot.results = snapshot.recompute();
    snapshot.to_json().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form helpers
// ---------------------------------------------------------------------------

/// Lenient number parsing for form fields; unparseable text is "0".
#[napi]
pub fn parse_number(text: String) -> String {
    input::parse_number(&text).to_string()
}

#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    Ok(input::format_currency(parse_decimal("amount", &amount)?))
}

#[napi]
pub fn format_percent(ratio: String, digits: u32) -> NapiResult<String> {
    Ok(input::format_percent(parse_decimal("ratio", &ratio)?, digits))
}
