//! # CSV Vaccine Repository
//!
//! File-based lot storage in a single `vaccines.csv` under the data
//! directory.
//!
//! ## CSV Format
//!
//! ```csv
//! id,commercial_name,generic_name,lot_number,quantity_received,quantity_on_hand,administered_doses,expiration_date,received_date
//! 1,Daptacel SDV,DTaP,3CA03C3,10,7,0,2025-10-01,2024-01-15
//! ```
//!
//! Dates are stored as ISO strings and parsed leniently on load; an
//! unreadable date becomes "no date" rather than a load failure. Mutations
//! rewrite the whole file atomically under a write lock.

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::connection::CsvConnection;
use crate::domain::classification::parse_date;
use crate::domain::models::vaccine::{NewVaccineLot, VaccineLot};
use crate::storage::traits::VaccineStorage;

/// CSV record structure for vaccine lots
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VaccineLotRecord {
    id: i64,
    commercial_name: String,
    generic_name: String,
    lot_number: String,
    quantity_received: u32,
    quantity_on_hand: u32,
    administered_doses: u32,
    expiration_date: String,
    received_date: String,
}

impl From<&VaccineLot> for VaccineLotRecord {
    fn from(lot: &VaccineLot) -> Self {
        Self {
            id: lot.id,
            commercial_name: lot.commercial_name.clone(),
            generic_name: lot.generic_name.clone(),
            lot_number: lot.lot_number.clone(),
            quantity_received: lot.quantity_received,
            quantity_on_hand: lot.quantity_on_hand,
            administered_doses: lot.administered_doses,
            expiration_date: format_stored_date(&lot.expiration_date),
            received_date: format_stored_date(&lot.received_date),
        }
    }
}

impl From<VaccineLotRecord> for VaccineLot {
    fn from(record: VaccineLotRecord) -> Self {
        VaccineLot {
            id: record.id,
            commercial_name: record.commercial_name,
            generic_name: record.generic_name,
            lot_number: record.lot_number,
            quantity_received: record.quantity_received,
            quantity_on_hand: record.quantity_on_hand,
            administered_doses: record.administered_doses,
            expiration_date: parse_date(&record.expiration_date),
            received_date: parse_date(&record.received_date),
        }
    }
}

fn format_stored_date(date: &Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// CSV-backed vaccine lot repository
#[derive(Clone)]
pub struct VaccineRepository {
    connection: Arc<CsvConnection>,
    write_lock: Arc<Mutex<()>>,
}

impl VaccineRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn load_all(&self) -> Result<Vec<VaccineLot>> {
        let path = self.connection.vaccines_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .from_path(&path)
            .with_context(|| format!("could not open {}", path.display()))?;
        let mut lots = Vec::new();
        for record in reader.deserialize::<VaccineLotRecord>() {
            let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
            lots.push(record.into());
        }
        debug!("Loaded {} lot(s) from {}", lots.len(), path.display());
        Ok(lots)
    }

    fn save_all(&self, lots: &[VaccineLot]) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for lot in lots {
            writer.serialize(VaccineLotRecord::from(lot))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("could not flush CSV buffer: {}", err.error()))?;
        let contents = String::from_utf8(bytes).context("CSV output was not UTF-8")?;
        self.connection
            .write_atomically(&self.connection.vaccines_file(), &contents)
    }
}

#[async_trait]
impl VaccineStorage for VaccineRepository {
    async fn store_vaccine(&self, lot: &NewVaccineLot) -> Result<VaccineLot> {
        let _guard = self.write_lock.lock().unwrap();
        let mut lots = self.load_all()?;
        let next_id = lots.iter().map(|existing| existing.id).max().unwrap_or(0) + 1;
        let stored = VaccineLot {
            id: next_id,
            commercial_name: lot.commercial_name.clone(),
            generic_name: lot.generic_name.clone(),
            lot_number: lot.lot_number.clone(),
            quantity_received: lot.quantity_received,
            quantity_on_hand: lot.quantity_on_hand,
            administered_doses: lot.administered_doses,
            expiration_date: lot.expiration_date,
            received_date: lot.received_date,
        };
        lots.push(stored.clone());
        self.save_all(&lots)?;
        Ok(stored)
    }

    async fn get_vaccine(&self, id: i64) -> Result<Option<VaccineLot>> {
        Ok(self.load_all()?.into_iter().find(|lot| lot.id == id))
    }

    async fn list_vaccines(&self) -> Result<Vec<VaccineLot>> {
        self.load_all()
    }

    async fn update_vaccine(&self, lot: &VaccineLot) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap();
        let mut lots = self.load_all()?;
        let Some(slot) = lots.iter_mut().find(|existing| existing.id == lot.id) else {
            return Ok(false);
        };
        *slot = lot.clone();
        self.save_all(&lots)?;
        Ok(true)
    }

    async fn delete_vaccine(&self, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap();
        let mut lots = self.load_all()?;
        let before = lots.len();
        lots.retain(|lot| lot.id != id);
        if lots.len() == before {
            return Ok(false);
        }
        self.save_all(&lots)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn repository() -> (TempDir, VaccineRepository) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        (temp, VaccineRepository::new(connection))
    }

    fn new_lot(commercial: &str) -> NewVaccineLot {
        NewVaccineLot {
            commercial_name: commercial.to_string(),
            generic_name: "DTaP".to_string(),
            lot_number: "3CA03C3".to_string(),
            quantity_received: 10,
            quantity_on_hand: 7,
            administered_doses: 0,
            expiration_date: NaiveDate::from_ymd_opt(2025, 10, 1),
            received_date: None,
        }
    }

    #[tokio::test]
    async fn test_store_assigns_sequential_ids_starting_at_one() {
        let (_temp, repository) = repository();
        let first = repository.store_vaccine(&new_lot("Daptacel")).await.unwrap();
        let second = repository.store_vaccine(&new_lot("Varivax")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_ids_do_not_reuse_after_delete() {
        let (_temp, repository) = repository();
        repository.store_vaccine(&new_lot("Daptacel")).await.unwrap();
        let second = repository.store_vaccine(&new_lot("Varivax")).await.unwrap();
        repository.delete_vaccine(1).await.unwrap();
        let third = repository.store_vaccine(&new_lot("Adacel")).await.unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_lot_fields() {
        let (_temp, repository) = repository();
        let stored = repository.store_vaccine(&new_lot("Daptacel")).await.unwrap();
        let loaded = repository.get_vaccine(stored.id).await.unwrap().unwrap();
        assert_eq!(loaded, stored);
        // Absent received date survives as absent
        assert_eq!(loaded.received_date, None);
    }

    #[tokio::test]
    async fn test_update_replaces_matching_lot() {
        let (_temp, repository) = repository();
        let mut stored = repository.store_vaccine(&new_lot("Daptacel")).await.unwrap();
        stored.quantity_on_hand = 2;
        assert!(repository.update_vaccine(&stored).await.unwrap());
        let loaded = repository.get_vaccine(stored.id).await.unwrap().unwrap();
        assert_eq!(loaded.quantity_on_hand, 2);

        let mut missing = stored.clone();
        missing.id = 99;
        assert!(!repository.update_vaccine(&missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_on_missing_file_is_empty() {
        let (_temp, repository) = repository();
        assert!(repository.list_vaccines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_stored_date_loads_as_absent() {
        let (temp, repository) = repository();
        std::fs::write(
            temp.path().join("vaccines.csv"),
            "id,commercial_name,generic_name,lot_number,quantity_received,quantity_on_hand,\
             administered_doses,expiration_date,received_date\n\
             1,Daptacel,DTaP,LOT-1,10,7,0,garbage,2024-01-15\n",
        )
        .unwrap();
        let lots = repository.list_vaccines().await.unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].expiration_date, None);
        assert_eq!(lots[0].received_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }
}
