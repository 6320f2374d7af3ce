use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homefin_core::budget::{self, BudgetCategory, BudgetInput, BudgetLine};

use crate::input;

/// Arguments for a 50/30/20 budget check
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly take-home income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// An expense as name:amount:needs|wants|savings (repeatable)
    #[arg(long = "line", value_name = "NAME:AMOUNT:CATEGORY")]
    pub lines: Vec<String>,

    /// Split income by needs:wants:savings percentages instead (e.g. 50:30:20)
    #[arg(long, value_name = "NEEDS:WANTS:SAVINGS")]
    pub split: Option<String>,
}

fn parse_category(text: &str) -> Result<BudgetCategory, Box<dyn std::error::Error>> {
    match text.trim().to_ascii_lowercase().as_str() {
        "needs" | "need" => Ok(BudgetCategory::Needs),
        "wants" | "want" => Ok(BudgetCategory::Wants),
        "savings" | "saving" => Ok(BudgetCategory::Savings),
        other => Err(format!("Unknown category '{}'. Use needs, wants or savings", other).into()),
    }
}

fn parse_line(spec: &str) -> Result<BudgetLine, Box<dyn std::error::Error>> {
    // Names may contain ':'; amount and category are always the last two fields
    let mut parts = spec.rsplitn(3, ':');
    let (Some(category), Some(amount), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("Budget line must be name:amount:category, got '{}'", spec).into());
    };
    Ok(BudgetLine {
        name: name.to_string(),
        amount: amount.parse()?,
        category: parse_category(category)?,
    })
}

fn parse_split(spec: &str) -> Result<[Decimal; 3], Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Split must be needs:wants:savings, got '{}'", spec).into());
    }
    Ok([parts[0].parse()?, parts[1].parse()?, parts[2].parse()?])
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref spec) = args.split {
        let income = args.income.ok_or("--income is required with --split")?;
        let [needs, wants, savings] = parse_split(spec)?;
        return Ok(serde_json::to_value(budget::split_income(
            income, needs, wants, savings,
        ))?);
    }

    let budget_input: BudgetInput = match input::read_structured(args.input.as_deref())? {
        Some(from_file) => from_file,
        None => BudgetInput {
            total_income: args.income.ok_or("--income is required (or provide --input)")?,
            lines: args
                .lines
                .iter()
                .map(|s| parse_line(s))
                .collect::<Result<Vec<_>, _>>()?,
        },
    };

    let result = budget::calculate_budget(&budget_input);
    Ok(serde_json::to_value(result)?)
}
