//! # Domain Module
//!
//! Business logic for the vaccine inventory: classification rules,
//! aggregation, shipment intake, dose administration, reports, exports,
//! settings, and edit authorization. Everything here is independent of the
//! transport and storage layers; services depend on the storage traits only.

pub mod aggregation;
pub mod authorization_service;
pub mod classification;
pub mod commands;
pub mod database_export_service;
pub mod export_service;
pub mod inventory_service;
pub mod models;
pub mod receiving_service;
pub mod report_service;
pub mod settings_service;

pub use authorization_service::AuthorizationService;
pub use database_export_service::DatabaseExportService;
pub use inventory_service::InventoryService;
pub use receiving_service::ReceivingService;
pub use report_service::ReportService;
pub use settings_service::SettingsService;
