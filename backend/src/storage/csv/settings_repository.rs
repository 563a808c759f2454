//! Settings persistence as a YAML document in the data directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::connection::CsvConnection;
use crate::domain::models::settings::Settings;
use crate::storage::traits::SettingsStorage;

/// YAML-backed settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    connection: Arc<CsvConnection>,
}

impl SettingsRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn load_settings(&self) -> Result<Option<Settings>> {
        let path = self.connection.settings_file();
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let settings = serde_yaml::from_str(&contents)
            .with_context(|| format!("could not parse {}", path.display()))?;
        Ok(Some(settings))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let contents = serde_yaml::to_string(settings).context("could not serialize settings")?;
        self.connection
            .write_atomically(&self.connection.settings_file(), &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository() -> (TempDir, SettingsRepository) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        (temp, SettingsRepository::new(connection))
    }

    #[tokio::test]
    async fn test_load_before_save_is_none() {
        let (_temp, repository) = repository();
        assert_eq!(repository.load_settings().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (_temp, repository) = repository();
        let mut settings = Settings::default();
        settings.facility_name = "Westside Clinic".to_string();
        settings.low_stock_threshold = 12;
        repository.save_settings(&settings).await.unwrap();
        assert_eq!(repository.load_settings().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (temp, repository) = repository();
        std::fs::write(temp.path().join("settings.yaml"), "{{{ not yaml").unwrap();
        assert!(repository.load_settings().await.is_err());
    }
}
