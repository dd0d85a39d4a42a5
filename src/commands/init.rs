use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its backups subdirectory and an initial `config.json` file.
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `args` - Carries the optional default budget.
///
/// # Errors
/// - Returns an error if any file operations fail or the directory is already initialized.
pub fn init(expenses_home: &Path, args: InitArgs) -> Result<Out<()>> {
    let config = Config::create(expenses_home, args.budget())
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the expenses directory at {}",
        config.root().display()
    )
    .into())
}
