//! The `stats` command: spending totals compared against a budget.

use crate::args::StatsArgs;
use crate::commands::{read_ledger, Out};
use crate::model::{Amount, Breakdown, Summary};
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A `Summary` of the ledger together with how it compares to a budget.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    count: usize,
    summary: Summary,
    budget: Option<Amount>,
    /// `budget - total`; negative when over budget.
    remaining: Option<Amount>,
    over_budget: bool,
}

impl Report {
    /// # Errors
    /// Returns an error if `budget - total` is outside the range of an `Amount`.
    pub fn new(count: usize, summary: Summary, budget: Option<Amount>) -> Result<Self> {
        let remaining = budget
            .map(|b| {
                b.checked_sub(summary.total())
                    .ok_or_else(|| anyhow!("The budget {b} is too far from the total spent"))
            })
            .transpose()?;
        let over_budget = remaining.is_some_and(|r| r.is_negative());
        Ok(Self {
            count,
            summary,
            budget,
            remaining,
            over_budget,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn budget(&self) -> Option<Amount> {
        self.budget
    }

    pub fn remaining(&self) -> Option<Amount> {
        self.remaining
    }

    pub fn over_budget(&self) -> bool {
        self.over_budget
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Total spent: {} across {} expense{}",
            self.summary.total(),
            self.count,
            if self.count == 1 { "" } else { "s" }
        )?;
        if let (Some(budget), Some(remaining)) = (self.budget, self.remaining) {
            writeln!(f, "Budget: {budget}")?;
            if self.over_budget {
                writeln!(f, "Over budget by {}", Amount::new(remaining.value().abs()))?;
            } else {
                writeln!(f, "Remaining: {remaining}")?;
            }
        }
        write_breakdown(f, "By category", self.summary.by_category())?;
        write_breakdown(f, "By payment method", self.summary.by_method())
    }
}

fn write_breakdown(f: &mut Formatter<'_>, title: &str, breakdown: &Breakdown) -> std::fmt::Result {
    if breakdown.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{title}:")?;
    let width = breakdown.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    for (label, amount) in breakdown.iter() {
        writeln!(f, "  {label:<width$}  {amount}")?;
    }
    Ok(())
}

/// Aggregates the ledger and compares the total against the budget from `args`, falling back to
/// the budget in `config.json`.
pub fn stats(config: Config, args: StatsArgs) -> Result<Out<Report>> {
    let ledger = read_ledger(&config)?;
    let budget = args.budget().or_else(|| config.budget());
    let summary = ledger
        .aggregate()
        .context("Unable to total the expenses in the ledger")?;
    let report = Report::new(ledger.len(), summary, budget)?;

    let message = match (report.budget(), report.remaining()) {
        (Some(_), Some(remaining)) if report.over_budget() => format!(
            "Spent {}, which is {} over budget",
            report.summary().total(),
            Amount::new(remaining.value().abs())
        ),
        (Some(_), Some(remaining)) => format!(
            "Spent {}, {} left in the budget",
            report.summary().total(),
            remaining
        ),
        _ => format!("Spent {}", report.summary().total()),
    };
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_report_remaining_and_over_budget() {
        let env = TestEnv::new();
        let ledger = env.seed(&[("Weekly shop", "250.0", "Groceries", "Card")]);
        let summary = ledger.aggregate().unwrap();

        let under = Report::new(1, summary.clone(), Some(amt("300"))).unwrap();
        assert_eq!(under.remaining(), Some(amt("50")));
        assert!(!under.over_budget());

        let exact = Report::new(1, summary.clone(), Some(amt("250"))).unwrap();
        assert!(exact.remaining().unwrap().is_zero());
        assert!(!exact.over_budget());

        let over = Report::new(1, summary.clone(), Some(amt("200"))).unwrap();
        assert_eq!(over.remaining(), Some(amt("-50")));
        assert!(over.over_budget());

        let none = Report::new(1, summary, None).unwrap();
        assert_eq!(none.remaining(), None);
        assert!(!none.over_budget());
    }

    #[test]
    fn test_stats_uses_config_budget() {
        let env = TestEnv::with_budget(Some("300"));
        env.seed(&[
            ("Weekly shop", "250.0", "Groceries", "Card"),
            ("Bus", "75.5", "Transport", "Cash"),
        ]);

        let out = stats(env.config(), StatsArgs::new(None)).unwrap();

        let report = out.structure().unwrap();
        assert_eq!(report.count(), 2);
        assert_eq!(report.summary().total(), amt("325.5"));
        assert_eq!(report.budget(), Some(amt("300")));
        assert!(report.over_budget());
        assert_eq!(out.message(), "Spent $325.50, which is $25.50 over budget");
    }

    #[test]
    fn test_stats_argument_overrides_config_budget() {
        let env = TestEnv::with_budget(Some("300"));
        env.seed(&[("Weekly shop", "250.0", "Groceries", "Card")]);
        let out = stats(env.config(), StatsArgs::new(Some(amt("1000")))).unwrap();
        assert_eq!(out.message(), "Spent $250.00, $750.00 left in the budget");
    }

    #[test]
    fn test_stats_renders_breakdowns() {
        let env = TestEnv::new();
        env.seed(&[
            ("Weekly shop", "250.0", "Groceries", "Card"),
            ("Bus", "75.5", "Transport", "Cash"),
        ]);
        let out = stats(env.config(), StatsArgs::new(None)).unwrap();
        let rendered = out.structure().unwrap().to_string();
        assert!(rendered.starts_with("Total spent: $325.50 across 2 expenses\n"));
        assert!(!rendered.contains("Budget"));
        assert!(rendered.contains("By category:\n  Groceries  $250.00\n  Transport  $75.50\n"));
        assert!(rendered.contains("By payment method:\n  Card  $250.00\n  Cash  $75.50\n"));
    }

    #[test]
    fn test_stats_empty_ledger() {
        let env = TestEnv::new();
        let out = stats(env.config(), StatsArgs::new(Some(amt("100")))).unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.count(), 0);
        assert!(report.summary().total().is_zero());
        assert_eq!(report.remaining(), Some(amt("100")));
        assert_eq!(out.message(), "Spent $0.00, $100.00 left in the budget");
    }

    #[test]
    fn test_report_serializes_breakdowns_in_order() {
        let env = TestEnv::new();
        let ledger = env.seed(&[
            ("Bus", "75.5", "Transport", "Cash"),
            ("Weekly shop", "250.0", "Groceries", "Card"),
        ]);
        let summary = ledger.aggregate().unwrap();
        let report = Report::new(ledger.len(), summary, None).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""by_category":{"Transport":"75.5","Groceries":"250.0"}"#));
        assert!(json.contains(r#""over_budget":false"#));
    }

    #[test]
    fn test_report_rejects_out_of_range_budget() {
        let env = TestEnv::new();
        let ledger = env.seed(&[("Weekly shop", "250.0", "Groceries", "Card")]);
        let summary = ledger.aggregate().unwrap();
        let budget = Amount::new(rust_decimal::Decimal::MIN);
        assert!(Report::new(1, summary, Some(budget)).is_err());
    }

    #[test]
    fn test_stats_reports_overflowing_ledger_as_error() {
        let env = TestEnv::new();
        env.write_ledger_file(
            r#"[
            {"id": 1, "date": "2024-05-01", "item": "A", "amount": "79228162514264337593543950335",
             "category": "Rent", "payment_method": "Transfer"},
            {"id": 2, "date": "2024-05-02", "item": "B", "amount": "1",
             "category": "Rent", "payment_method": "Transfer"}
        ]"#,
        );
        let err = stats(env.config(), StatsArgs::new(None)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("would overflow the ledger total"));
    }
}
