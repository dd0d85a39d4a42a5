use crate::Result;
use anyhow::Context;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents).context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Create a directory and any missing parents.
pub(crate) fn make_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)
        .with_context(|| format!("Unable to create directory at {}", path.to_string_lossy()))
}

pub(crate) fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    fs::canonicalize(path)
        .with_context(|| format!("Unable to canonicalize the path {}", path.to_string_lossy()))
}

/// List the paths of the entries in a directory.
pub(crate) fn read_dir(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let entries = fs::read_dir(path)
        .with_context(|| format!("Unable to read directory {}", path.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        paths.push(entry.path());
    }
    Ok(paths)
}

/// Copy the file at `from` to `to`.
pub(crate) fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    fs::copy(from, to).with_context(|| {
        format!(
            "Unable to copy file from '{}' to '{}'",
            from.to_string_lossy(),
            to.to_string_lossy()
        )
    })?;
    Ok(())
}

/// Remove a file.
pub(crate) fn remove(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::remove_file(path).with_context(|| format!("Unable to remove {}", path.display()))
}

/// Returns today's date in YYYY-MM-DD format.
pub(crate) fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
