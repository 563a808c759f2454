//! Facility settings: load, merge updates, reset.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::models::settings::Settings;
use crate::storage::traits::SettingsStorage;

/// Service managing the persisted facility settings
#[derive(Clone)]
pub struct SettingsService {
    settings_storage: Arc<dyn SettingsStorage>,
}

impl SettingsService {
    pub fn new(settings_storage: Arc<dyn SettingsStorage>) -> Self {
        Self { settings_storage }
    }

    /// Current settings. A missing or unreadable settings file yields the
    /// shipped defaults so the application always starts.
    pub async fn get(&self) -> Settings {
        match self.settings_storage.load_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!("Could not load settings, using defaults: {:#}", err);
                Settings::default()
            }
        }
    }

    /// Merge the supplied fields into the current settings and persist.
    pub async fn update(&self, command: UpdateSettingsCommand) -> Result<Settings> {
        let mut settings = self.get().await;

        if let Some(name) = command.facility_name {
            settings.facility_name = name;
        }
        if let Some(threshold) = command.low_stock_threshold {
            settings.low_stock_threshold = threshold;
        }
        if let Some(days) = command.expiration_warning_days {
            settings.expiration_warning_days = days;
        }
        if let Some(auto_backup) = command.auto_backup {
            settings.auto_backup = auto_backup;
        }
        if let Some(email) = command.email_notifications {
            settings.email_notifications = email;
        }
        if let Some(sms) = command.sms_notifications {
            settings.sms_notifications = sms;
        }
        if let Some(frequency) = command.reporting_frequency {
            settings.reporting_frequency = frequency;
        }

        self.settings_storage.save_settings(&settings).await?;
        info!("Settings updated");
        Ok(settings)
    }

    /// Restore and persist the shipped defaults.
    pub async fn reset(&self) -> Result<Settings> {
        let settings = Settings::default();
        self.settings_storage.save_settings(&settings).await?;
        info!("Settings reset to defaults");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::connection::CsvConnection;
    use crate::storage::csv::settings_repository::SettingsRepository;
    use tempfile::TempDir;

    fn service() -> (TempDir, SettingsService) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        let repository = Arc::new(SettingsRepository::new(connection));
        (temp, SettingsService::new(repository))
    }

    #[tokio::test]
    async fn test_get_returns_defaults_before_first_save() {
        let (_temp, service) = service();
        assert_eq!(service.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_update_merges_and_persists() {
        let (_temp, service) = service();
        let updated = service
            .update(UpdateSettingsCommand {
                facility_name: Some("Westside Clinic".to_string()),
                low_stock_threshold: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.facility_name, "Westside Clinic");
        assert_eq!(updated.low_stock_threshold, 10);
        // Untouched fields keep their defaults
        assert_eq!(updated.expiration_warning_days, 30);

        let reloaded = service.get().await;
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let (_temp, service) = service();
        service
            .update(UpdateSettingsCommand {
                sms_notifications: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        let reset = service.reset().await.unwrap();
        assert_eq!(reset, Settings::default());
        assert_eq!(service.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_corrupt_settings_file_falls_back_to_defaults() {
        let (temp, service) = service();
        std::fs::write(temp.path().join("settings.yaml"), "{{{ not yaml").unwrap();
        assert_eq!(service.get().await, Settings::default());
    }
}
