//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod delete;
mod init;
mod insert;
mod query;
mod stats;

use crate::backup::{PRE_SAVE, UNREADABLE_LEDGER};
use crate::model::Ledger;
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::{debug, info, warn};

pub use delete::delete_expense;
pub use init::init;
pub use insert::add_expense;
pub use query::{list_expenses, Rows};
pub use stats::{stats, Report};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

/// How `list` renders expenses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A markdown table.
    #[default]
    Table,
    /// A JSON array in the same shape as the ledger file.
    Json,
    /// CSV with a header row.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug + Display,
{
    /// Like `print`, and also writes the rendered structure to stdout.
    pub fn print_rendered(&self) {
        self.print();
        if let Some(structure) = self.structure() {
            println!("{structure}");
        }
    }
}

/// Loads the ledger for a read-only command. An unreadable ledger file is reported and treated
/// as empty; it is left untouched on disk.
pub(crate) fn read_ledger(config: &Config) -> Result<Ledger> {
    config
        .store()
        .load_or_empty()
        .context("Unable to load the ledger")
}

/// Loads the ledger for a command that will save it again. An unreadable ledger file is copied to
/// the backups directory first, so that saving over it does not lose it.
pub(crate) fn load_ledger_for_update(config: &Config) -> Result<Ledger> {
    let store = config.store();
    match store.load() {
        Ok(ledger) => Ok(ledger),
        Err(e) if e.is_recoverable() => {
            let copy = config
                .backup()
                .preserve(UNREADABLE_LEDGER, store.path())
                .context("Unable to back up the unreadable ledger")?;
            warn!(
                "{e}. A copy was saved to {} and an empty ledger will be used.",
                copy.display()
            );
            Ok(Ledger::new())
        }
        Err(e) => Err(anyhow::Error::from(e).context("Unable to load the ledger")),
    }
}

/// Snapshots the current ledger file, if any, into the backups directory and then saves `ledger`
/// over it.
pub(crate) fn save_ledger(config: &Config, ledger: &Ledger) -> Result<()> {
    let store = config.store();
    if store.path().is_file() {
        config
            .backup()
            .preserve(PRE_SAVE, store.path())
            .context("Unable to snapshot the ledger before saving")?;
    }
    store.save(ledger).context("Unable to save the ledger")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_load_for_update_preserves_unreadable_ledger() {
        let env = TestEnv::new();
        env.write_ledger_file("this is not a ledger");

        let ledger = load_ledger_for_update(&env.config()).unwrap();

        assert!(ledger.is_empty());
        let names = env.backup_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("unreadable-ledger."));
        let copy = env.config().backups().join(&names[0]);
        assert_eq!(
            std::fs::read_to_string(copy).unwrap(),
            "this is not a ledger"
        );
    }

    #[test]
    fn test_read_ledger_does_not_back_up() {
        let env = TestEnv::new();
        env.write_ledger_file("[{]");
        assert!(read_ledger(&env.config()).unwrap().is_empty());
        assert!(env.backup_names().is_empty());
    }

    #[test]
    fn test_save_ledger_snapshots_previous_file() {
        let env = TestEnv::new();
        let config = env.config();

        save_ledger(&config, &Ledger::new()).unwrap();
        assert!(env.backup_names().is_empty());

        let seeded = env.seed(&[("Lunch", "12.50", "Food", "Card")]);
        save_ledger(&config, &seeded).unwrap();
        let names = env.backup_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("pre-save."));
        assert_eq!(env.ledger(), seeded);
    }

    #[test]
    fn test_output_format_strings() {
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
