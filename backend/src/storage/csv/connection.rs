//! File-system connection: owns the data directory and hands out file paths.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory location
pub const DATA_DIR_ENV_VAR: &str = "VAXTRACK_DATA_DIR";

const DEFAULT_DIR_NAME: &str = "VaxTrack";

/// CsvConnection manages file paths under one base data directory
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at an explicit directory. The directory is
    /// created on first write, not here.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Self {
        Self {
            base_directory: base_directory.as_ref().to_path_buf(),
        }
    }

    /// Create a connection in the default data directory:
    /// `$VAXTRACK_DATA_DIR` when set, otherwise `Documents/VaxTrack`.
    pub fn new_default() -> Result<Self> {
        if let Ok(overridden) = std::env::var(DATA_DIR_ENV_VAR) {
            if !overridden.trim().is_empty() {
                info!("Using data directory from {}: {}", DATA_DIR_ENV_VAR, overridden);
                return Ok(Self::new(overridden));
            }
        }

        let documents = dirs::document_dir()
            .context("could not determine the user's Documents directory")?;
        let data_dir = documents.join(DEFAULT_DIR_NAME);
        info!("Using default data directory: {}", data_dir.display());
        Ok(Self::new(data_dir))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Create the base directory if it does not exist yet
    pub fn ensure_base_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.base_directory).with_context(|| {
            format!(
                "could not create data directory {}",
                self.base_directory.display()
            )
        })
    }

    pub fn vaccines_file(&self) -> PathBuf {
        self.base_directory.join("vaccines.csv")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_directory.join("settings.yaml")
    }

    pub fn edit_attempts_file(&self) -> PathBuf {
        self.base_directory.join("edit_attempts.csv")
    }

    /// Write a file atomically: temp file in the same directory, then rename
    pub fn write_atomically(&self, path: &Path, contents: &str) -> Result<()> {
        self.ensure_base_directory()?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("could not write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("could not move {} into place", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_paths_live_under_the_base_directory() {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path());
        assert_eq!(connection.vaccines_file(), temp.path().join("vaccines.csv"));
        assert_eq!(connection.settings_file(), temp.path().join("settings.yaml"));
        assert_eq!(
            connection.edit_attempts_file(),
            temp.path().join("edit_attempts.csv")
        );
    }

    #[test]
    fn test_atomic_write_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path().join("nested"));
        let target = connection.vaccines_file();
        connection.write_atomically(&target, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(target).unwrap(), "hello");
    }
}
