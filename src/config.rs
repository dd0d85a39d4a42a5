//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and contains settings such as
//! the number of backup copies to keep, an optional default budget and an optional location for
//! the ledger file.

use crate::backup::Backup;
use crate::model::Amount;
use crate::store::LedgerStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const LEDGER_JSON: &str = "finance_data.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the expenses home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its backups subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
    /// - `budget` - An optional default budget used by `stats` when none is given.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    /// - Returns an error if `dir` already contains a `config.json`.
    pub fn create(dir: impl Into<PathBuf>, budget: Option<Amount>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups)?;

        let config_file = ConfigFile {
            budget,
            ..ConfigFile::default()
        };
        config_file.save(&config_path)?;

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `expenses_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        let root = utils::canonicalize(&maybe_relative).context("Expenses home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}'. Run `expenses init` first.",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path)?;

        let config = Self {
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn budget(&self) -> Option<Amount> {
        self.config_file.budget
    }

    /// Returns the stored `ledger_path` if it is absolute, otherwise resolves it against the
    /// expenses home directory.
    pub fn ledger_path(&self) -> PathBuf {
        let p = self.config_file.ledger_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// A store for the configured ledger file.
    pub fn store(&self) -> LedgerStore {
        LedgerStore::new(self.ledger_path())
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "backup_copies": 5,
///   "budget": "1500.00",
///   "ledger_path": "finance_data.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per backup kind
    backup_copies: u32,

    /// Default spending limit compared against the ledger total by `stats`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<Amount>,

    /// Path to the ledger file (optional, relative to the expenses home or absolute)
    /// Defaults to $EXPENSES_HOME/finance_data.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ledger_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            budget: None,
            ledger_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, if `app_name` is wrong, or if
    /// `backup_copies` is zero.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        // Rotation would delete each backup as soon as it is written.
        anyhow::ensure!(
            config.backup_copies > 0,
            "Invalid backup_copies in config file {}: at least one copy must be kept",
            path.display()
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }

    fn ledger_path(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(LEDGER_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[test]
    fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("expenses_home");
        let budget = Amount::from_str("1500").unwrap();

        let config = Config::create(&home_dir, Some(budget)).unwrap();

        assert_eq!(config.budget(), Some(budget));
        assert_eq!(config.backup_copies(), BACKUP_COPIES);
        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.ledger_path(), config.root().join(LEDGER_JSON));
        assert!(!config.ledger_path().exists());
    }

    #[test]
    fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), None).unwrap();
        let result = Config::create(dir.path(), None);
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path(), None).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
        assert_eq!(loaded.budget(), None);
    }

    #[test]
    fn test_config_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path());
        assert!(result.unwrap_err().to_string().contains("config file is missing"));
    }

    #[test]
    fn test_config_load_missing_backups_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path(), None).unwrap();
        std::fs::remove_dir(config.backups()).unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.backup_copies, 5);
        assert_eq!(config.budget, None);
        assert_eq!(config.ledger_path(), PathBuf::from(LEDGER_JSON));
    }

    #[test]
    fn test_config_file_load_with_custom_ledger_path() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(BACKUPS)).unwrap();
        let json = r#"{
            "app_name": "expenses",
            "config_version": 1,
            "backup_copies": 3,
            "budget": "$2,000.00",
            "ledger_path": "data/ledger.json"
        }"#;
        std::fs::write(temp_dir.path().join(CONFIG_JSON), json).unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.backup_copies(), 3);
        assert_eq!(config.budget(), Some(Amount::from_str("2000").unwrap()));
        let expected = config.root().join("data").join("ledger.json");
        assert_eq!(config.ledger_path(), expected);
        assert_eq!(config.store().path(), config.ledger_path());
    }

    #[test]
    fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "backup_copies": 5
        }"#;
        std::fs::write(&config_path, json).unwrap();

        let result = ConfigFile::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_load_rejects_zero_backup_copies() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(BACKUPS)).unwrap();
        let json = r#"{
            "app_name": "expenses",
            "config_version": 1,
            "backup_copies": 0
        }"#;
        std::fs::write(temp_dir.path().join(CONFIG_JSON), json).unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid backup_copies"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("budget"));
        assert!(!json.contains("ledger_path"));
    }

    #[test]
    fn test_config_file_save_and_load() {
        let t = TempDir::new().unwrap();
        let path = t.path().join("file.json");
        let original = ConfigFile {
            budget: Some(Amount::from_str("99.95").unwrap()),
            ledger_path: Some(PathBuf::from("/tmp/elsewhere.json")),
            ..ConfigFile::default()
        };
        original.save(&path).unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), original);
    }
}
