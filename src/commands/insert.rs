//! Add command handler.

use crate::args::AddArgs;
use crate::commands::{load_ledger_for_update, save_ledger, Out};
use crate::model::{Expense, NewExpense};
use crate::{utils, Config, Result};
use anyhow::{ensure, Context};

/// Adds a new expense to the ledger and saves it.
///
/// The text fields are trimmed, the category and payment method get an upper-case first letter,
/// and a missing or blank date becomes today's date. The ledger assigns the id.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - A message indicating the expense was added.
/// - The stored expense, including its id.
///
/// # Errors
///
/// - Returns an error if the item is blank.
/// - Returns an error if the amount is zero or negative. Nothing is saved in that case.
/// - Returns an error if the ledger cannot be loaded or saved.
pub fn add_expense(config: Config, args: AddArgs) -> Result<Out<Expense>> {
    let item = args.item().trim();
    ensure!(!item.is_empty(), "The item must not be empty");

    let date = match args.date().map(str::trim) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => utils::today(),
    };

    let new = NewExpense {
        date,
        item: item.to_string(),
        amount: args.amount(),
        category: capitalize(args.category().trim()),
        payment_method: capitalize(args.payment_method().trim()),
        notes: args.notes().unwrap_or_default().trim().to_string(),
    };

    let mut ledger = load_ledger_for_update(&config)?;
    let expense = ledger.add(new).context("Unable to add the expense")?;
    save_ledger(&config, &ledger)?;

    let message = format!(
        "Added expense {} for {}: {}",
        expense.id(),
        expense.amount(),
        expense.item()
    );
    Ok(Out::new(message, expense))
}

/// Upper-cases the first character and leaves the rest as typed.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
