use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vaccine lot as exposed over the wire.
///
/// Dates are ISO 8601 (`YYYY-MM-DD`) strings; missing or unparseable stored
/// dates travel as `None` and render as "N/A" downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccine {
    pub id: i64,
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: String,
    /// Doses in the shipment as received (before quality inspection)
    pub quantity_received: u32,
    pub quantity_on_hand: u32,
    pub administered_doses: u32,
    pub expiration_date: Option<String>,
    pub received_date: Option<String>,
    /// Badge label derived from expiration/stock classification
    pub status: String,
}

/// Response containing a list of vaccine lots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineListResponse {
    pub vaccines: Vec<Vaccine>,
}

/// Request to record a received shipment after quality inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveVaccineRequest {
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: String,
    /// Doses the supplier claims to have sent (informational only)
    pub quantity_sent: Option<u32>,
    pub quantity_received: u32,
    pub expiration_date: String,
    pub received_date: String,
    pub doses_passed: u32,
    /// Defaults to 0 when omitted
    pub doses_failed: Option<u32>,
    /// Required whenever doses_failed > 0
    pub discrepancy_reason: Option<String>,
}

/// Response after a successful receiving submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveVaccineResponse {
    pub vaccine: Vaccine,
    pub success_message: String,
}

/// Request for inline field edits on an existing lot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVaccineRequest {
    pub commercial_name: Option<String>,
    pub generic_name: Option<String>,
    pub lot_number: Option<String>,
    pub quantity_on_hand: Option<u32>,
    pub expiration_date: Option<String>,
    pub received_date: Option<String>,
}

/// Request to administer doses from a lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministerDosesRequest {
    pub doses: u32,
}

/// Response after administering doses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministerDosesResponse {
    pub vaccine: Vaccine,
    pub success_message: String,
}

/// One field-scoped validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failure payload returned with HTTP 400
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

/// Dashboard metric counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_doses_on_hand: u64,
    pub total_administered_doses: u64,
    pub expiring_soon: usize,
    pub expired: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

/// One row of a generated report.
///
/// Lot-level reports fill every field; aggregate reports (orders,
/// vaccines-to-order) leave the lot-specific fields `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: Option<String>,
    pub expiration_date: Option<String>,
    pub received_date: Option<String>,
    pub quantity_on_hand: u32,
    pub administered_doses: u32,
    pub status: String,
}

/// JSON preview of a generated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report_type: String,
    pub title: String,
    pub generated_at: String,
    pub records: Vec<ReportRecord>,
}

/// CSV rendering of a report plus a suggested filename
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCsvResponse {
    pub filename: String,
    pub content: String,
    pub record_count: usize,
}

/// Paginated fixed-width print rendering of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPrintResponse {
    pub filename: String,
    pub pages: Vec<String>,
    pub record_count: usize,
}

/// Metadata block of a database export.
///
/// Field names mirror the hosted store's JSON schema, hence camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: String,
    pub total_tables: usize,
    pub export_version: String,
}

/// One exported table: records in the store's own schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableExport {
    pub record_count: usize,
    pub success: bool,
    pub records: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full database export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseExport {
    pub metadata: ExportMetadata,
    pub tables: BTreeMap<String, TableExport>,
}

/// Per-table outcome of a database import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableImportResult {
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a database import; partial success is reported, not rolled back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success: bool,
    pub total_imported: usize,
    pub total_failed: usize,
    pub summary: String,
    pub results: BTreeMap<String, TableImportResult>,
}

/// Facility-wide settings, persisted across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub facility_name: String,
    pub low_stock_threshold: u32,
    pub expiration_warning_days: u32,
    pub auto_backup: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub reporting_frequency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            facility_name: "Healthcare Facility".to_string(),
            low_stock_threshold: 5,
            expiration_warning_days: 30,
            auto_backup: true,
            email_notifications: true,
            sms_notifications: false,
            reporting_frequency: "monthly".to_string(),
        }
    }
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub facility_name: Option<String>,
    pub low_stock_threshold: Option<u32>,
    pub expiration_warning_days: Option<u32>,
    pub auto_backup: Option<bool>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub reporting_frequency: Option<String>,
}

/// Request to authorize a privileged inline edit or database import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAuthorizationRequest {
    pub credential: String,
}

/// Response from an edit-authorization check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAuthorizationResponse {
    pub success: bool,
    pub message: String,
}

/// One recorded edit-authorization attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAttempt {
    pub id: i64,
    pub timestamp: String,
    pub success: bool,
}
