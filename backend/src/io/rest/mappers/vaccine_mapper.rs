//! Conversions between domain models and the wire DTOs in `shared`.

use chrono::{Local, NaiveDate};

use crate::domain::classification::{overall_status_as_of, stock_status};
use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::commands::vaccines::{DashboardSummaryResult, ReceiveVaccineCommand, UpdateVaccineCommand};
use crate::domain::models::audit::EditAttempt;
use crate::domain::models::settings::Settings;
use crate::domain::models::vaccine::{AggregatedVaccine, VaccineLot};
use crate::domain::receiving_service::VaccineValidationError;

fn iso_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn vaccine_to_dto(lot: &VaccineLot, low_stock_threshold: u32) -> shared::Vaccine {
    let status = overall_status_as_of(
        lot.quantity_on_hand,
        lot.expiration_date,
        low_stock_threshold,
        Local::now().date_naive(),
    );
    shared::Vaccine {
        id: lot.id,
        commercial_name: lot.commercial_name.clone(),
        generic_name: lot.generic_name.clone(),
        lot_number: lot.lot_number.clone(),
        quantity_received: lot.quantity_received,
        quantity_on_hand: lot.quantity_on_hand,
        administered_doses: lot.administered_doses,
        expiration_date: iso_date(lot.expiration_date),
        received_date: iso_date(lot.received_date),
        status: status.as_str().to_string(),
    }
}

pub fn receive_request_to_command(request: shared::ReceiveVaccineRequest) -> ReceiveVaccineCommand {
    ReceiveVaccineCommand {
        commercial_name: request.commercial_name,
        generic_name: request.generic_name,
        lot_number: request.lot_number,
        quantity_received: Some(request.quantity_received),
        doses_passed: Some(request.doses_passed),
        doses_failed: request.doses_failed,
        discrepancy_reason: request.discrepancy_reason,
        expiration_date: Some(request.expiration_date),
        received_date: Some(request.received_date),
    }
}

pub fn update_request_to_command(request: shared::UpdateVaccineRequest) -> UpdateVaccineCommand {
    UpdateVaccineCommand {
        commercial_name: request.commercial_name,
        generic_name: request.generic_name,
        lot_number: request.lot_number,
        quantity_on_hand: request.quantity_on_hand,
        expiration_date: request.expiration_date,
        received_date: request.received_date,
    }
}

pub fn validation_errors_to_response(
    errors: &[VaccineValidationError],
) -> shared::ValidationErrorResponse {
    shared::ValidationErrorResponse {
        errors: errors
            .iter()
            .map(|error| shared::FieldError {
                field: error.field().to_string(),
                message: error.to_string(),
            })
            .collect(),
    }
}

pub fn dashboard_to_dto(summary: DashboardSummaryResult) -> shared::DashboardSummary {
    shared::DashboardSummary {
        total_doses_on_hand: summary.total_doses_on_hand,
        total_administered_doses: summary.total_administered_doses,
        expiring_soon: summary.expiring_soon_count,
        expired: summary.expired_count,
        low_stock: summary.low_stock_count,
        out_of_stock: summary.out_of_stock_count,
    }
}

pub fn lot_to_report_record(lot: &VaccineLot, low_stock_threshold: u32) -> shared::ReportRecord {
    let status = overall_status_as_of(
        lot.quantity_on_hand,
        lot.expiration_date,
        low_stock_threshold,
        Local::now().date_naive(),
    );
    shared::ReportRecord {
        commercial_name: lot.commercial_name.clone(),
        generic_name: lot.generic_name.clone(),
        lot_number: Some(lot.lot_number.clone()),
        expiration_date: iso_date(lot.expiration_date),
        received_date: iso_date(lot.received_date),
        quantity_on_hand: lot.quantity_on_hand,
        administered_doses: lot.administered_doses,
        status: status.as_str().to_string(),
    }
}

pub fn aggregate_to_report_record(
    aggregate: &AggregatedVaccine,
    low_stock_threshold: u32,
) -> shared::ReportRecord {
    shared::ReportRecord {
        commercial_name: aggregate.commercial_name.clone(),
        generic_name: aggregate.generic_name.clone(),
        lot_number: None,
        expiration_date: None,
        received_date: None,
        quantity_on_hand: aggregate.quantity_on_hand,
        administered_doses: aggregate.administered_doses,
        status: stock_status(aggregate.quantity_on_hand, low_stock_threshold)
            .as_str()
            .to_string(),
    }
}

pub fn settings_to_dto(settings: Settings) -> shared::Settings {
    shared::Settings {
        facility_name: settings.facility_name,
        low_stock_threshold: settings.low_stock_threshold,
        expiration_warning_days: settings.expiration_warning_days,
        auto_backup: settings.auto_backup,
        email_notifications: settings.email_notifications,
        sms_notifications: settings.sms_notifications,
        reporting_frequency: settings.reporting_frequency,
    }
}

pub fn settings_request_to_command(request: shared::UpdateSettingsRequest) -> UpdateSettingsCommand {
    UpdateSettingsCommand {
        facility_name: request.facility_name,
        low_stock_threshold: request.low_stock_threshold,
        expiration_warning_days: request.expiration_warning_days,
        auto_backup: request.auto_backup,
        email_notifications: request.email_notifications,
        sms_notifications: request.sms_notifications,
        reporting_frequency: request.reporting_frequency,
    }
}

/// Attempted credentials stay server-side; only the outcome travels.
pub fn attempt_to_dto(attempt: &EditAttempt) -> shared::EditAttempt {
    shared::EditAttempt {
        id: attempt.id,
        timestamp: attempt.timestamp.clone(),
        success: attempt.success,
    }
}
