//! Record-level view over the CSV files for whole-database export/import.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::connection::CsvConnection;
use super::settings_repository::SettingsRepository;
use super::vaccine_repository::VaccineRepository;
use crate::domain::models::settings::Settings;
use crate::storage::schema;
use crate::storage::traits::{RecordStore, SettingsStorage, VaccineStorage};

pub const VACCINE_TABLE: &str = "vaccine";
pub const SETTING_TABLE: &str = "setting";

/// Record store over the CSV repositories. Records cross this boundary in
/// the external schema; translation happens in [`schema`].
#[derive(Clone)]
pub struct CsvRecordStore {
    vaccines: VaccineRepository,
    settings: SettingsRepository,
}

impl CsvRecordStore {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            vaccines: VaccineRepository::new(connection.clone()),
            settings: SettingsRepository::new(connection),
        }
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    fn table_names(&self) -> Vec<String> {
        vec![VACCINE_TABLE.to_string(), SETTING_TABLE.to_string()]
    }

    async fn fetch_records(&self, table: &str) -> Result<Vec<Value>> {
        match table {
            VACCINE_TABLE => Ok(self
                .vaccines
                .list_vaccines()
                .await?
                .iter()
                .map(schema::vaccine_to_record)
                .collect()),
            SETTING_TABLE => {
                let settings = self
                    .settings
                    .load_settings()
                    .await?
                    .unwrap_or_else(Settings::default);
                Ok(vec![schema::settings_to_record(&settings)])
            }
            other => Err(anyhow!("unknown table '{other}'")),
        }
    }

    async fn create_records(&self, table: &str, records: &[Value]) -> Result<usize> {
        match table {
            VACCINE_TABLE => {
                for record in records {
                    let lot = schema::vaccine_from_record(record);
                    self.vaccines.store_vaccine(&lot).await?;
                }
                Ok(records.len())
            }
            SETTING_TABLE => {
                // The settings table is a single document; the last record wins
                if let Some(record) = records.last() {
                    let settings = schema::settings_from_record(record);
                    self.settings.save_settings(&settings).await?;
                }
                Ok(records.len())
            }
            other => Err(anyhow!("unknown table '{other}'")),
        }
    }
}
