//! Mapping between domain models and the external record schema used by
//! whole-database export and import.
//!
//! Exported records carry custom fields with a `_c` suffix
//! (`commercialName_c`) plus store-managed system fields. Nothing outside
//! this module knows that naming; the rest of the backend works with the
//! domain models.

use serde_json::{json, Map, Value};

use crate::domain::classification::parse_date;
use crate::domain::models::settings::Settings;
use crate::domain::models::vaccine::{NewVaccineLot, VaccineLot};

/// Fields the store manages itself. Stripped from incoming records so an
/// import never tries to overwrite bookkeeping columns.
pub const SYSTEM_FIELDS: [&str; 6] = [
    "Id",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "Owner",
];

/// Remove system fields from a record object. Non-objects pass through.
pub fn strip_system_fields(record: &Value) -> Value {
    match record.as_object() {
        Some(fields) => Value::Object(
            fields
                .iter()
                .filter(|(name, _)| !SYSTEM_FIELDS.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<Map<String, Value>>(),
        ),
        None => record.clone(),
    }
}

pub fn vaccine_to_record(lot: &VaccineLot) -> Value {
    json!({
        "Id": lot.id,
        "commercialName_c": lot.commercial_name,
        "genericName_c": lot.generic_name,
        "lotNumber_c": lot.lot_number,
        "quantityReceived_c": lot.quantity_received,
        "quantityOnHand_c": lot.quantity_on_hand,
        "administeredDoses_c": lot.administered_doses,
        "expirationDate_c": lot.expiration_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "receivedDate_c": lot.received_date.map(|d| d.format("%Y-%m-%d").to_string()),
    })
}

/// Build a lot from an external record. Accepts both the `_c` suffixed and
/// the bare field names, and tolerates numbers arriving as strings.
pub fn vaccine_from_record(record: &Value) -> NewVaccineLot {
    NewVaccineLot {
        commercial_name: string_field(record, "commercialName"),
        generic_name: string_field(record, "genericName"),
        lot_number: string_field(record, "lotNumber"),
        quantity_received: numeric_field(record, "quantityReceived"),
        quantity_on_hand: numeric_field(record, "quantityOnHand"),
        administered_doses: numeric_field(record, "administeredDoses"),
        expiration_date: field(record, "expirationDate")
            .and_then(Value::as_str)
            .and_then(parse_date),
        received_date: field(record, "receivedDate")
            .and_then(Value::as_str)
            .and_then(parse_date),
    }
}

pub fn settings_to_record(settings: &Settings) -> Value {
    json!({
        "Id": 1,
        "facilityName_c": settings.facility_name,
        "lowStockThreshold_c": settings.low_stock_threshold,
        "expirationWarningDays_c": settings.expiration_warning_days,
        "autoBackup_c": settings.auto_backup,
        "emailNotifications_c": settings.email_notifications,
        "smsNotifications_c": settings.sms_notifications,
        "reportingFrequency_c": settings.reporting_frequency,
    })
}

/// Build settings from an external record, falling back to the defaults for
/// any field that is absent or malformed.
pub fn settings_from_record(record: &Value) -> Settings {
    let defaults = Settings::default();
    Settings {
        facility_name: field(record, "facilityName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.facility_name),
        low_stock_threshold: opt_numeric_field(record, "lowStockThreshold")
            .unwrap_or(defaults.low_stock_threshold),
        expiration_warning_days: opt_numeric_field(record, "expirationWarningDays")
            .unwrap_or(defaults.expiration_warning_days),
        auto_backup: field(record, "autoBackup")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.auto_backup),
        email_notifications: field(record, "emailNotifications")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.email_notifications),
        sms_notifications: field(record, "smsNotifications")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.sms_notifications),
        reporting_frequency: field(record, "reportingFrequency")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.reporting_frequency),
    }
}

fn field<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    let suffixed = format!("{name}_c");
    record
        .get(&suffixed)
        .or_else(|| record.get(name))
        .filter(|value| !value.is_null())
}

fn string_field(record: &Value, name: &str) -> String {
    field(record, name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_numeric_field(record: &Value, name: &str) -> Option<u32> {
    let value = field(record, name)?;
    if let Some(number) = value.as_u64() {
        return u32::try_from(number).ok();
    }
    value.as_str().and_then(|raw| raw.trim().parse().ok())
}

fn numeric_field(record: &Value, name: &str) -> u32 {
    opt_numeric_field(record, name).unwrap_or(0)
}
