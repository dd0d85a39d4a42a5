//! These structs provide the CLI interface for the expenses CLI.

use crate::commands::OutputFormat;
use crate::model::Amount;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expenses: A command-line expense tracker.
///
/// Records expenses in a local JSON ledger and reports what you have spent, broken down by
/// category and by payment method, against an optional budget.
///
/// Run `expenses init` once to create the data directory, then use `add`, `delete`, `list` and
/// `stats`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// By default the data directory is $HOME/expenses. Pass --expenses-home or set
    /// EXPENSES_HOME to put it somewhere else.
    Init(InitArgs),
    /// Record a new expense.
    Add(AddArgs),
    /// Delete an expense by its ID.
    Delete(DeleteArgs),
    /// List expenses, optionally only those in one category.
    List(ListArgs),
    /// Show total spending by category and payment method, compared against a budget.
    Stats(StatsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and configuration are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// A default spending limit for `expenses stats`, e.g. 1500 or $1,500.00
    #[arg(long)]
    budget: Option<Amount>,
}

impl InitArgs {
    pub fn new(budget: Option<Amount>) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Option<Amount> {
        self.budget
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What was bought.
    #[arg(long)]
    item: String,

    /// How much was spent. Must be greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// The spending category, e.g. Groceries.
    #[arg(long)]
    category: String,

    /// How it was paid for, e.g. Card or Cash.
    #[arg(long)]
    payment_method: String,

    /// The date of the expense. Defaults to today (YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,

    /// Free-form notes.
    #[arg(long)]
    notes: Option<String>,
}

impl AddArgs {
    pub fn new(
        item: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            amount,
            category: category.into(),
            payment_method: payment_method.into(),
            date: None,
            notes: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the expense to delete.
    id: u64,
}

impl DeleteArgs {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Args for the `expenses list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Only list expenses in this category. Matching ignores case.
    #[arg(long)]
    category: Option<String>,

    /// How to render the expenses.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ListArgs {
    pub fn new(category: Option<String>, format: OutputFormat) -> Self {
        Self { category, format }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `expenses stats` command.
#[derive(Debug, Parser, Clone)]
pub struct StatsArgs {
    /// The spending limit to compare against. Defaults to the budget in config.json, if any.
    #[arg(long)]
    budget: Option<Amount>,
}

impl StatsArgs {
    pub fn new(budget: Option<Amount>) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Option<Amount> {
        self.budget
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "expenses",
            "--expenses-home",
            "/tmp/x",
            "add",
            "--item",
            "Coffee",
            "--amount",
            "$3.50",
            "--category",
            "food",
            "--payment-method",
            "card",
        ])
        .unwrap();
        assert_eq!(args.common().expenses_home().path(), Path::new("/tmp/x"));
        match args.command() {
            Command::Add(add) => {
                assert_eq!(add.item(), "Coffee");
                assert_eq!(add.amount(), Amount::from_str("3.5").unwrap());
                assert_eq!(add.date(), None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_amount_reaches_the_ledger() {
        let args = Args::try_parse_from([
            "expenses",
            "add",
            "--item",
            "Refund",
            "--amount",
            "-10",
            "--category",
            "Misc",
            "--payment-method",
            "Cash",
        ])
        .unwrap();
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert!(add.amount().is_negative());
    }

    #[test]
    fn test_parse_bad_amount() {
        let result = Args::try_parse_from([
            "expenses",
            "stats",
            "--budget",
            "lots",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_defaults() {
        let args = Args::try_parse_from(["expenses", "--log-level", "debug", "list"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.format(), OutputFormat::Table);
        assert_eq!(list.category(), None);
    }

    #[test]
    fn test_parse_list_csv_for_category() {
        let args = Args::try_parse_from([
            "expenses", "list", "--category", "Food", "--format", "csv",
        ])
        .unwrap();
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.format(), OutputFormat::Csv);
        assert_eq!(list.category(), Some("Food"));
    }
}
