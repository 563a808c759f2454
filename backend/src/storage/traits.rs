//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::audit::EditAttempt;
use crate::domain::models::settings::Settings;
use crate::domain::models::vaccine::{NewVaccineLot, VaccineLot};

/// Trait defining the interface for vaccine lot storage operations
#[async_trait]
pub trait VaccineStorage: Send + Sync {
    /// Store a new lot, assigning it the next available id
    async fn store_vaccine(&self, lot: &NewVaccineLot) -> Result<VaccineLot>;

    /// Retrieve a specific lot by id
    async fn get_vaccine(&self, id: i64) -> Result<Option<VaccineLot>>;

    /// List all lots in stored order
    async fn list_vaccines(&self) -> Result<Vec<VaccineLot>>;

    /// Replace the stored lot with the same id
    /// Returns false when no such lot exists
    async fn update_vaccine(&self, lot: &VaccineLot) -> Result<bool>;

    /// Delete a lot by id
    /// Returns false when no such lot exists
    async fn delete_vaccine(&self, id: i64) -> Result<bool>;
}

/// Trait defining the interface for settings persistence
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Load the persisted settings, `None` when nothing has been saved yet
    async fn load_settings(&self) -> Result<Option<Settings>>;

    /// Persist the full settings document
    async fn save_settings(&self, settings: &Settings) -> Result<()>;
}

/// Trait defining the interface for the edit-authorization audit trail
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Append one attempt to the trail
    async fn record_attempt(&self, attempt: &EditAttempt) -> Result<()>;

    /// List attempts, most recent first
    async fn list_attempts(&self) -> Result<Vec<EditAttempt>>;
}

/// Uniform record-level access used by whole-database export and import.
///
/// Records cross this boundary as JSON objects in the external field naming,
/// so the exchange format stays independent of the storage schema.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Names of the tables this store exposes, in export order
    fn table_names(&self) -> Vec<String>;

    /// Fetch every record of one table as external-format JSON objects
    async fn fetch_records(&self, table: &str) -> Result<Vec<Value>>;

    /// Create records in one table from external-format JSON objects.
    /// Returns the number of records created.
    async fn create_records(&self, table: &str, records: &[Value]) -> Result<usize>;
}
