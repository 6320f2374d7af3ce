use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use crate::time_value::safe_div;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// 50/30/20 bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Needs,
    Wants,
    Savings,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 3] = [
        BudgetCategory::Needs,
        BudgetCategory::Wants,
        BudgetCategory::Savings,
    ];

    /// Share of income the 50/30/20 rule suggests for this bucket.
    pub fn target_percent(self) -> Percent {
        match self {
            BudgetCategory::Needs => dec!(50),
            BudgetCategory::Wants => dec!(30),
            BudgetCategory::Savings => dec!(20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub name: String,
    pub amount: Money,
    pub category: BudgetCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub total_income: Money,
    #[serde(default)]
    pub lines: Vec<BudgetLine>,
}

/// Actual spending by bucket compared with 50/30/20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub remaining: Money,
    pub per_category_total: BTreeMap<BudgetCategory, Money>,
    pub per_category_percent_of_income: BTreeMap<BudgetCategory, Percent>,
    pub targets: BTreeMap<BudgetCategory, Percent>,
    /// Actual percent minus target percent
    pub variance_percent: BTreeMap<BudgetCategory, Percent>,
}

/// Income divided by chosen percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSplit {
    pub needs: Money,
    pub wants: Money,
    pub savings: Money,
    /// `100 - (needs% + wants% + savings%)`; negative when over-allocated
    pub unallocated_percent: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Bucket expense lines and compare them with the 50/30/20 targets.
///
/// Percentages are zero when there is no income. Every category appears in
/// every map, with zero when no line uses it.
pub fn allocate_budget(total_income: Money, lines: &[BudgetLine]) -> BudgetSummary {
    let mut per_category_total: BTreeMap<BudgetCategory, Money> =
        BudgetCategory::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();
    for line in lines {
        *per_category_total.entry(line.category).or_insert(Decimal::ZERO) += line.amount;
    }

    let total_expenses: Money = lines.iter().map(|l| l.amount).sum();

    let per_category_percent_of_income: BTreeMap<BudgetCategory, Percent> = per_category_total
        .iter()
        .map(|(cat, amount)| (*cat, safe_div(*amount, total_income) * HUNDRED))
        .collect();

    let targets: BTreeMap<BudgetCategory, Percent> = BudgetCategory::ALL
        .iter()
        .map(|c| (*c, c.target_percent()))
        .collect();

    let variance_percent = per_category_percent_of_income
        .iter()
        .map(|(cat, pct)| (*cat, *pct - cat.target_percent()))
        .collect();

    debug!(
        lines = lines.len(),
        total_expenses = %total_expenses,
        "allocated budget"
    );

    BudgetSummary {
        total_income,
        total_expenses,
        remaining: total_income - total_expenses,
        per_category_total,
        per_category_percent_of_income,
        targets,
        variance_percent,
    }
}

/// Divide income by explicit needs/wants/savings percentages.
pub fn split_income(
    income: Money,
    needs_percent: Percent,
    wants_percent: Percent,
    savings_percent: Percent,
) -> IncomeSplit {
    IncomeSplit {
        needs: income * needs_percent / HUNDRED,
        wants: income * wants_percent / HUNDRED,
        savings: income * savings_percent / HUNDRED,
        unallocated_percent: HUNDRED - needs_percent - wants_percent - savings_percent,
    }
}

/// Budget summary with the standard computation envelope.
pub fn calculate_budget(input: &BudgetInput) -> ComputationOutput<BudgetSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.total_income <= Decimal::ZERO {
        warnings.push("Enter your monthly take-home income to see percentages".into());
    }

    let summary = allocate_budget(input.total_income, &input.lines);
    if summary.remaining < Decimal::ZERO {
        warnings.push(format!(
            "Expenses exceed income by {}",
            (-summary.remaining).round_dp(2)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Needs/wants/savings allocation vs 50/30/20",
        input,
        warnings,
        elapsed,
        summary,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn line(name: &str, amount: Decimal, category: BudgetCategory) -> BudgetLine {
        BudgetLine {
            name: name.into(),
            amount,
            category,
        }
    }

    fn sample_lines() -> Vec<BudgetLine> {
        vec![
            line("Rent", dec!(1800), BudgetCategory::Needs),
            line("Groceries", dec!(600), BudgetCategory::Needs),
            line("Dining out", dec!(300), BudgetCategory::Wants),
            line("Streaming", dec!(50), BudgetCategory::Wants),
            line("401k", dec!(750), BudgetCategory::Savings),
        ]
    }

    #[test]
    fn test_category_totals() {
        let s = allocate_budget(dec!(5000), &sample_lines());
        assert_eq!(s.per_category_total[&BudgetCategory::Needs], dec!(2400));
        assert_eq!(s.per_category_total[&BudgetCategory::Wants], dec!(350));
        assert_eq!(s.per_category_total[&BudgetCategory::Savings], dec!(750));
        assert_eq!(s.total_expenses, dec!(3500));
        assert_eq!(s.remaining, dec!(1500));
    }

    #[test]
    fn test_percent_of_income_and_variance() {
        let s = allocate_budget(dec!(5000), &sample_lines());
        assert_eq!(s.per_category_percent_of_income[&BudgetCategory::Needs], dec!(48));
        assert_eq!(s.per_category_percent_of_income[&BudgetCategory::Wants], dec!(7));
        assert_eq!(s.per_category_percent_of_income[&BudgetCategory::Savings], dec!(15));
        assert_eq!(s.variance_percent[&BudgetCategory::Needs], dec!(-2));
        assert_eq!(s.variance_percent[&BudgetCategory::Savings], dec!(-5));
        assert_eq!(s.targets[&BudgetCategory::Wants], dec!(30));
    }

    #[test]
    fn test_zero_income_guarded() {
        let s = allocate_budget(Decimal::ZERO, &sample_lines());
        assert!(s.per_category_percent_of_income.values().all(|p| p.is_zero()));
        assert_eq!(s.remaining, dec!(-3500));
    }

    #[test]
    fn test_empty_lines_have_every_category() {
        let s = allocate_budget(dec!(4000), &[]);
        assert_eq!(s.per_category_total.len(), 3);
        assert_eq!(s.remaining, dec!(4000));
    }

    #[test]
    fn test_split_income() {
        let split = split_income(dec!(5000), dec!(60), dec!(25), dec!(15));
        assert_eq!(split.needs, dec!(3000));
        assert_eq!(split.wants, dec!(1250));
        assert_eq!(split.savings, dec!(750));
        assert_eq!(split.unallocated_percent, Decimal::ZERO);
    }

    #[test]
    fn test_split_income_over_allocated() {
        let split = split_income(dec!(1000), dec!(70), dec!(30), dec!(10));
        assert_eq!(split.unallocated_percent, dec!(-10));
    }

    #[test]
    fn test_overspend_warning() {
        let input = BudgetInput {
            total_income: dec!(3000),
            lines: sample_lines(),
        };
        let out = calculate_budget(&input);
        assert_eq!(out.warnings, vec!["Expenses exceed income by 500".to_string()]);
    }
}
