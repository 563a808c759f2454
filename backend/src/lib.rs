//! VaxTrack backend: vaccine lot inventory, receiving, administration,
//! reports, exports, and settings behind a REST API.
//!
//! Layering follows domain-driven lines: `io` holds the transport, `domain`
//! the business rules and services, `storage` the persistence traits and the
//! CSV backend that implements them.

use anyhow::Result;
use log::info;
use std::sync::Arc;

pub mod domain;
pub mod io;
pub mod storage;

pub use io::rest::{create_router, AppState};

use domain::authorization_service::ConfiguredCredentialVerifier;
use domain::{
    AuthorizationService, DatabaseExportService, InventoryService, ReceivingService,
    ReportService, SettingsService,
};
use storage::csv::{
    AuditRepository, CsvConnection, CsvRecordStore, SettingsRepository, VaccineRepository,
};

/// Wire up storage and services against the default data directory.
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up storage");
    let connection = Arc::new(CsvConnection::new_default()?);
    connection.ensure_base_directory()?;

    let vaccine_repository = Arc::new(VaccineRepository::new(connection.clone()));
    let settings_repository = Arc::new(SettingsRepository::new(connection.clone()));
    let audit_repository = Arc::new(AuditRepository::new(connection.clone()));
    let record_store = Arc::new(CsvRecordStore::new(connection));

    info!("Setting up domain services");
    let app_state = AppState {
        inventory_service: InventoryService::new(vaccine_repository.clone()),
        receiving_service: ReceivingService::new(vaccine_repository.clone()),
        report_service: ReportService::new(vaccine_repository),
        database_export_service: DatabaseExportService::new(record_store),
        settings_service: SettingsService::new(settings_repository),
        authorization_service: AuthorizationService::new(
            Arc::new(ConfiguredCredentialVerifier::from_env()),
            audit_repository,
        ),
    };

    Ok(app_state)
}
