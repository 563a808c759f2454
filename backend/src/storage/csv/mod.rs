//! CSV/YAML file storage backend.

pub mod audit_repository;
pub mod connection;
pub mod record_store;
pub mod settings_repository;
pub mod vaccine_repository;

pub use audit_repository::AuditRepository;
pub use connection::CsvConnection;
pub use record_store::CsvRecordStore;
pub use settings_repository::SettingsRepository;
pub use vaccine_repository::VaccineRepository;
