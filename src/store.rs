//! Durable storage for the ledger as a single JSON document.
//!
//! The whole ledger is read and written as one unit. Saves go to a temporary sibling file that is
//! then renamed over the ledger file, so a reader never observes a partially written ledger.
//!
//! There is no coordination between processes: if two processes load the same file and both save,
//! the last save wins and the other's changes are lost.

use crate::error::LedgerError;
use crate::model::Ledger;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads and saves a `Ledger` at a fixed path.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the ledger.
    ///
    /// A missing file is the normal first-run case and yields an empty ledger.
    ///
    /// # Errors
    /// - `LedgerError::Malformed` if the file exists but does not hold a ledger. This is
    ///   recoverable: the caller may preserve the file and carry on with an empty ledger.
    /// - `LedgerError::Storage` for any other I/O failure.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No ledger at {}, starting with an empty ledger",
                    self.path.display()
                );
                return Ok(Ledger::new());
            }
            Err(source) => return Err(self.storage_error(source)),
        };

        let ledger: Ledger =
            serde_json::from_str(&content).map_err(|source| LedgerError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "Loaded {} expenses from {}",
            ledger.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    /// Reads the ledger, treating an unreadable file as an empty ledger.
    ///
    /// Saving the result overwrites the unreadable file. Prefer `load` when the file should be
    /// preserved first.
    pub fn load_or_empty(&self) -> Result<Ledger, LedgerError> {
        match self.load() {
            Err(e) if e.is_recoverable() => {
                warn!("{e}; continuing with an empty ledger");
                Ok(Ledger::new())
            }
            other => other,
        }
    }

    /// Writes the full ledger, replacing whatever was there.
    ///
    /// Creates the parent directory and the file if they do not exist.
    pub fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(ledger).map_err(LedgerError::Serialize)?;

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|source| self.storage_error(source))?;
        }

        let temp_path = self.temp_path();
        if let Err(source) = write_synced(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.storage_error(source));
        }
        rename_with_fallback(&temp_path, &self.path).map_err(|source| self.storage_error(source))?;

        debug!("Saved {} expenses to {}", ledger.len(), self.path.display());
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    /// `finance_data.json` -> `.finance_data.json.tmp` in the same directory.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "ledger".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn storage_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Renames `temp_path` over `destination`, removing the temp file if that fails.
///
/// On Unix `rename` replaces an existing destination atomically, so any failure is real and the
/// destination is left alone. Windows can refuse to rename onto an existing file; there the
/// destination is removed and the rename retried once.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> std::io::Result<()> {
    let result = match fs::rename(temp_path, destination) {
        #[cfg(windows)]
        Err(initial_err) if destination.is_file() => {
            let _ = fs::remove_file(destination);
            fs::rename(temp_path, destination).map_err(|retry_err| {
                std::io::Error::new(
                    retry_err.kind(),
                    format!("Atomic rename failed (initial: {initial_err}, retry: {retry_err})"),
                )
            })
        }
        other => other,
    };
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}
