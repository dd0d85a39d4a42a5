//! Backup management for copies of the ledger file.

use crate::{utils, Config, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for copies of a ledger file that could not be parsed.
pub const UNREADABLE_LEDGER: &str = "unreadable-ledger";

/// Prefix for snapshots of the ledger taken before it is overwritten.
pub const PRE_SAVE: &str = "pre-save";

const EXTENSION: &str = "json";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Copies `source` into the backups directory.
    ///
    /// The filename format is `{prefix}.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files for `prefix`.
    ///
    /// Returns the path to the created backup file.
    pub fn preserve(&self, prefix: &str, source: &Path) -> Result<PathBuf> {
        let date = utils::today();
        let seq = self.next_sequence_number(prefix, &date)?;
        let filename = format!("{prefix}.{date}-{seq:03}.{EXTENSION}");
        let path = self.backups_dir.join(&filename);

        utils::copy(source, &path)?;
        debug!("Backed up {} to {}", source.display(), path.display());

        self.rotate(prefix)?;

        Ok(path)
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let max_seq = self
            .backup_names(prefix)?
            .iter()
            .filter_map(|(_, name)| parse_sequence_number(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files = self.backup_names(prefix)?;

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            debug!("Removing old backup {}", path.display());
            utils::remove(&path)?;
        }

        Ok(())
    }

    /// Paths and file names of the backups with the given prefix.
    fn backup_names(&self, prefix: &str) -> Result<Vec<(PathBuf, String)>> {
        Ok(utils::read_dir(&self.backups_dir)?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().to_string();
                is_backup_file(&name, prefix).then_some((path, name))
            })
            .collect())
    }
}

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match `{prefix}.{date}-{NNN}.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    let remainder = filename.strip_prefix(&format!("{prefix}.{date}-"))?;
    let seq_str = remainder.strip_suffix(&format!(".{EXTENSION}"))?;
    seq_str.parse().ok()
}

/// Checks if a filename is a backup file with the given prefix.
fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(&format!(".{EXTENSION}"))
}
