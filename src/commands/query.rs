//! The `list` command: renders expenses as a table, JSON or CSV.

use crate::args::ListArgs;
use crate::commands::{read_ledger, OutputFormat, Out};
use crate::model::Expense;
use crate::{Config, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

// =============================================================================
// Rows type for listing results
// =============================================================================

/// Listed expenses in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of expense objects, the same shape as the ledger file.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

impl Rows {
    fn render(expenses: &[Expense], format: OutputFormat) -> Result<Self> {
        Ok(match format {
            OutputFormat::Table => Rows::Table(markdown_table(expenses)),
            OutputFormat::Json => Rows::Json(
                serde_json::to_value(expenses).context("Unable to serialize expenses to JSON")?,
            ),
            OutputFormat::Csv => Rows::Csv(csv_text(expenses)?),
        })
    }
}

// =============================================================================
// Command implementation
// =============================================================================

/// Lists the expenses in the ledger, or only those in `args.category()` (ignoring case), in
/// ledger order.
pub fn list_expenses(config: Config, args: ListArgs) -> Result<Out<Rows>> {
    let ledger = read_ledger(&config)?;
    let expenses = match args.category() {
        Some(category) => ledger.filter_by_category(category),
        None => ledger.into_data(),
    };

    let count = expenses.len();
    let mut message = format!(
        "Found {} expense{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    if let Some(category) = args.category() {
        message.push_str(&format!(" in category '{category}'"));
    }

    let rows = Rows::render(&expenses, args.format())?;
    Ok(Out::new(message, rows))
}

const HEADERS: [&str; 7] = [
    "ID",
    "Date",
    "Item",
    "Amount",
    "Category",
    "Payment Method",
    "Notes",
];

fn markdown_table(expenses: &[Expense]) -> String {
    let mut table = format!("| {} |\n", HEADERS.join(" | "));
    table.push_str(&format!("|{}\n", "---|".repeat(HEADERS.len())));
    for e in expenses {
        let cells = [
            e.id().to_string(),
            e.date().to_string(),
            e.item().to_string(),
            e.amount().to_string(),
            e.category().to_string(),
            e.payment_method().to_string(),
            e.notes().to_string(),
        ];
        let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
        table.push_str(&format!("| {} |\n", escaped.join(" | ")));
    }
    table
}

fn csv_text(expenses: &[Expense]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if expenses.is_empty() {
        writer
            .write_record([
                "id",
                "date",
                "item",
                "amount",
                "category",
                "payment_method",
                "notes",
            ])
            .context("Unable to write CSV header")?;
    }
    for expense in expenses {
        writer
            .serialize(expense)
            .context("Unable to write expense as CSV")?;
    }
    let bytes = writer.into_inner().context("Unable to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
