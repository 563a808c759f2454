//! Whole-database export to JSON and re-import from the same document.

use anyhow::Result;
use chrono::Utc;
use log::{error, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::storage::schema::strip_system_fields;
use crate::storage::traits::RecordStore;
use shared::{DatabaseExport, ExportMetadata, ImportSummary, TableExport, TableImportResult};

pub const EXPORT_VERSION: &str = "1.0";
pub const IMPORT_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid import document: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Service moving whole tables across the record-store boundary
#[derive(Clone)]
pub struct DatabaseExportService {
    record_store: Arc<dyn RecordStore>,
}

impl DatabaseExportService {
    pub fn new(record_store: Arc<dyn RecordStore>) -> Self {
        Self { record_store }
    }

    /// Export every table the store exposes. A table that fails to read is
    /// reported in place with its error; the export itself always succeeds.
    pub async fn export_all(&self) -> Result<DatabaseExport> {
        let table_names = self.record_store.table_names();
        let mut tables = BTreeMap::new();

        for table in &table_names {
            let export = match self.record_store.fetch_records(table).await {
                Ok(records) => {
                    info!("Exported {} record(s) from table '{}'", records.len(), table);
                    TableExport {
                        record_count: records.len(),
                        success: true,
                        records,
                        error: None,
                    }
                }
                Err(err) => {
                    error!("Export of table '{}' failed: {:#}", table, err);
                    TableExport {
                        record_count: 0,
                        success: false,
                        records: Vec::new(),
                        error: Some(err.to_string()),
                    }
                }
            };
            tables.insert(table.clone(), export);
        }

        Ok(DatabaseExport {
            metadata: ExportMetadata {
                export_date: Utc::now().to_rfc3339(),
                total_tables: table_names.len(),
                export_version: EXPORT_VERSION.to_string(),
            },
            tables,
        })
    }

    /// Import a previously exported document. System fields are stripped and
    /// records resubmitted in batches; a table that partially fails keeps its
    /// successful batches and the outcome reports both counts.
    pub async fn import(&self, document: &Value) -> Result<ImportSummary, ImportError> {
        let tables = document
            .get("tables")
            .ok_or_else(|| ImportError::InvalidFormat("missing 'tables' object".to_string()))?
            .as_object()
            .ok_or_else(|| ImportError::InvalidFormat("'tables' must be an object".to_string()))?;

        let mut results = BTreeMap::new();
        let mut total_imported = 0;
        let mut total_failed = 0;

        for (table, entry) in tables {
            let records = entry
                .get("records")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ImportError::InvalidFormat(format!(
                        "table '{table}' is missing its 'records' array"
                    ))
                })?;

            let cleaned: Vec<Value> = records.iter().map(strip_system_fields).collect();
            let mut imported = 0;
            let mut failed = 0;
            let mut last_error = None;

            for batch in cleaned.chunks(IMPORT_BATCH_SIZE) {
                match self.record_store.create_records(table, batch).await {
                    Ok(count) => imported += count,
                    Err(err) => {
                        warn!(
                            "Import batch of {} record(s) into '{}' failed: {:#}",
                            batch.len(),
                            table,
                            err
                        );
                        failed += batch.len();
                        last_error = Some(err.to_string());
                    }
                }
            }

            info!(
                "Imported {} record(s) into '{}' ({} failed)",
                imported, table, failed
            );
            total_imported += imported;
            total_failed += failed;
            results.insert(
                table.clone(),
                TableImportResult {
                    success: failed == 0,
                    imported,
                    failed,
                    total: cleaned.len(),
                    error: last_error,
                },
            );
        }

        let summary = if total_failed == 0 {
            format!("{total_imported} records imported successfully")
        } else {
            format!("{total_imported} records imported successfully, {total_failed} failed")
        };

        Ok(ImportSummary {
            success: total_failed == 0,
            total_imported,
            total_failed,
            summary,
            results,
        })
    }
}
