use rust_decimal::Decimal;
use std::path::PathBuf;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the ledger engine and the ledger store.
///
/// Everything above the core (config, backups, commands) wraps these in `anyhow` with context.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger file could not be read or written for a reason other than it not existing.
    #[error("Unable to access the ledger at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger file exists but is not a well-formed ledger document.
    #[error("The ledger at {} is unreadable: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory ledger could not be encoded.
    #[error("Unable to serialize the ledger: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Expense amounts must be greater than zero.
    #[error("Invalid amount {0}: an expense amount must be greater than zero")]
    InvalidAmount(Decimal),

    /// Adding the amount would take a total out of the range of a decimal amount.
    #[error("Adding {0} would overflow the ledger total")]
    AmountOverflow(Decimal),

    /// The largest id in the ledger is already `u64::MAX`.
    #[error("No expense ids are left: the ledger already holds id {}", u64::MAX)]
    IdsExhausted,
}

impl LedgerError {
    /// Returns true when the caller may continue with an empty ledger, i.e. the file exists but
    /// could not be parsed. The caller should preserve the file before overwriting it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LedgerError::Malformed { .. })
    }
}
