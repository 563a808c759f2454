//! Shipment intake: validation of the receiving form and creation of lots.

use chrono::Local;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::classification::parse_date;
use crate::domain::commands::vaccines::ReceiveVaccineCommand;
use crate::domain::models::vaccine::{NewVaccineLot, VaccineLot};
use crate::storage::traits::VaccineStorage;

/// One rejected aspect of a receiving form. Fields are named after the form
/// controls so the UI can attach each message to the right input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VaccineValidationError {
    #[error("Vaccine name is required")]
    MissingCommercialName,
    #[error("Generic name is required")]
    MissingGenericName,
    #[error("Lot number is required")]
    MissingLotNumber,
    #[error("Quantity received is required")]
    MissingQuantityReceived,
    #[error("Quantity received must be greater than zero")]
    ZeroQuantityReceived,
    #[error("Doses passed inspection is required")]
    MissingDosesPassed,
    #[error("Expiration date is required")]
    MissingExpirationDate,
    #[error("Expiration date is not a valid date: {value}")]
    InvalidExpirationDate { value: String },
    #[error("Received date is not a valid date: {value}")]
    InvalidReceivedDate { value: String },
    #[error("A discrepancy reason is required when doses fail inspection")]
    MissingDiscrepancyReason,
    #[error("Doses passed plus doses failed ({inspected}) must equal quantity received ({received})")]
    InspectionMismatch { inspected: u64, received: u64 },
}

impl VaccineValidationError {
    /// Form field this error belongs to. The inspection total check spans
    /// three inputs and gets its own pseudo-field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingCommercialName => "commercialName",
            Self::MissingGenericName => "genericName",
            Self::MissingLotNumber => "lotNumber",
            Self::MissingQuantityReceived | Self::ZeroQuantityReceived => "quantityReceived",
            Self::MissingDosesPassed => "dosesPassed",
            Self::MissingExpirationDate | Self::InvalidExpirationDate { .. } => "expirationDate",
            Self::InvalidReceivedDate { .. } => "receivedDate",
            Self::MissingDiscrepancyReason => "discrepancyReason",
            Self::InspectionMismatch { .. } => "inspection",
        }
    }
}

#[derive(Debug, Error)]
pub enum ReceivingError {
    #[error("receiving form failed validation")]
    Validation(Vec<VaccineValidationError>),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Check a receiving form and collect every problem at once, so the user
/// fixes the whole form in one pass instead of one field per submit.
pub fn validate(command: &ReceiveVaccineCommand) -> Vec<VaccineValidationError> {
    let mut errors = Vec::new();

    if command.commercial_name.trim().is_empty() {
        errors.push(VaccineValidationError::MissingCommercialName);
    }
    if command.generic_name.trim().is_empty() {
        errors.push(VaccineValidationError::MissingGenericName);
    }
    if command.lot_number.trim().is_empty() {
        errors.push(VaccineValidationError::MissingLotNumber);
    }

    match command.quantity_received {
        None => errors.push(VaccineValidationError::MissingQuantityReceived),
        Some(0) => errors.push(VaccineValidationError::ZeroQuantityReceived),
        Some(_) => {}
    }

    if command.doses_passed.is_none() {
        errors.push(VaccineValidationError::MissingDosesPassed);
    }

    match command.expiration_date.as_deref().map(str::trim) {
        None | Some("") => errors.push(VaccineValidationError::MissingExpirationDate),
        Some(raw) => {
            if parse_date(raw).is_none() {
                errors.push(VaccineValidationError::InvalidExpirationDate {
                    value: raw.to_string(),
                });
            }
        }
    }

    if let Some(raw) = command.received_date.as_deref().map(str::trim) {
        if !raw.is_empty() && parse_date(raw).is_none() {
            errors.push(VaccineValidationError::InvalidReceivedDate {
                value: raw.to_string(),
            });
        }
    }

    let doses_failed = command.doses_failed.unwrap_or(0);
    if doses_failed > 0 {
        let reason_given = command
            .discrepancy_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty());
        if !reason_given {
            errors.push(VaccineValidationError::MissingDiscrepancyReason);
        }
    }

    // Only meaningful once the individual quantities are present
    if let (Some(received), Some(passed)) = (command.quantity_received, command.doses_passed) {
        let inspected = passed as u64 + doses_failed as u64;
        if inspected != received as u64 {
            errors.push(VaccineValidationError::InspectionMismatch {
                inspected,
                received: received as u64,
            });
        }
    }

    errors
}

/// Service for receiving vaccine shipments into the inventory
#[derive(Clone)]
pub struct ReceivingService {
    vaccine_storage: Arc<dyn VaccineStorage>,
}

impl ReceivingService {
    pub fn new(vaccine_storage: Arc<dyn VaccineStorage>) -> Self {
        Self { vaccine_storage }
    }

    /// Validate the form and create a new lot. Only doses that passed
    /// inspection become stock on hand; the received date defaults to today.
    pub async fn receive(
        &self,
        command: ReceiveVaccineCommand,
    ) -> Result<VaccineLot, ReceivingError> {
        let errors = validate(&command);
        if !errors.is_empty() {
            warn!(
                "Receiving form for '{}' rejected with {} validation error(s)",
                command.commercial_name,
                errors.len()
            );
            return Err(ReceivingError::Validation(errors));
        }

        // validate() guarantees both quantities are present
        let quantity_received = command.quantity_received.unwrap_or(0);
        let doses_passed = command.doses_passed.unwrap_or(0);

        let received_date = command
            .received_date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| Some(Local::now().date_naive()));

        let new_lot = NewVaccineLot {
            commercial_name: command.commercial_name.trim().to_string(),
            generic_name: command.generic_name.trim().to_string(),
            lot_number: command.lot_number.trim().to_string(),
            quantity_received,
            quantity_on_hand: doses_passed,
            administered_doses: 0,
            expiration_date: command.expiration_date.as_deref().and_then(parse_date),
            received_date,
        };

        let lot = self.vaccine_storage.store_vaccine(&new_lot).await?;
        info!(
            "Received lot {} of {}: {} doses, {} on hand",
            lot.lot_number, lot.commercial_name, lot.quantity_received, lot.quantity_on_hand
        );
        Ok(lot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::connection::CsvConnection;
    use crate::storage::csv::vaccine_repository::VaccineRepository;
    use tempfile::TempDir;

    fn service() -> (TempDir, ReceivingService) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        let repository = Arc::new(VaccineRepository::new(connection));
        (temp, ReceivingService::new(repository))
    }

    fn valid_command() -> ReceiveVaccineCommand {
        ReceiveVaccineCommand {
            commercial_name: "Daptacel SDV".to_string(),
            generic_name: "DTaP".to_string(),
            lot_number: "3CA03C3".to_string(),
            quantity_received: Some(10),
            doses_passed: Some(7),
            doses_failed: Some(3),
            discrepancy_reason: Some("Broken vials".to_string()),
            expiration_date: Some("2025-10-01".to_string()),
            received_date: Some("2024-01-15".to_string()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate(&valid_command()).is_empty());
    }

    #[test]
    fn test_blank_fields_are_all_reported_at_once() {
        let errors = validate(&ReceiveVaccineCommand::default());
        assert!(errors.contains(&VaccineValidationError::MissingCommercialName));
        assert!(errors.contains(&VaccineValidationError::MissingGenericName));
        assert!(errors.contains(&VaccineValidationError::MissingLotNumber));
        assert!(errors.contains(&VaccineValidationError::MissingQuantityReceived));
        assert!(errors.contains(&VaccineValidationError::MissingDosesPassed));
        assert!(errors.contains(&VaccineValidationError::MissingExpirationDate));
    }

    #[test]
    fn test_inspection_totals_must_reconcile() {
        let mut command = valid_command();
        command.doses_failed = Some(2);
        let errors = validate(&command);
        assert_eq!(
            errors,
            vec![VaccineValidationError::InspectionMismatch {
                inspected: 9,
                received: 10
            }]
        );
        assert_eq!(errors[0].field(), "inspection");
    }

    #[test]
    fn test_failed_doses_require_a_reason() {
        let mut command = valid_command();
        command.discrepancy_reason = Some("   ".to_string());
        let errors = validate(&command);
        assert_eq!(errors, vec![VaccineValidationError::MissingDiscrepancyReason]);

        // No failures, no reason needed
        let mut clean = valid_command();
        clean.doses_failed = Some(0);
        clean.doses_passed = Some(10);
        clean.discrepancy_reason = None;
        assert!(validate(&clean).is_empty());
    }

    #[test]
    fn test_unparseable_dates_are_rejected() {
        let mut command = valid_command();
        command.expiration_date = Some("next spring".to_string());
        command.received_date = Some("soon".to_string());
        let errors = validate(&command);
        assert!(errors.contains(&VaccineValidationError::InvalidExpirationDate {
            value: "next spring".to_string()
        }));
        assert!(errors.contains(&VaccineValidationError::InvalidReceivedDate {
            value: "soon".to_string()
        }));
    }

    #[tokio::test]
    async fn test_receive_creates_lot_with_passed_doses_on_hand() {
        let (_temp, service) = service();
        let lot = service.receive(valid_command()).await.unwrap();
        assert_eq!(lot.quantity_received, 10);
        assert_eq!(lot.quantity_on_hand, 7);
        assert_eq!(lot.administered_doses, 0);
        assert_eq!(
            lot.expiration_date,
            chrono::NaiveDate::from_ymd_opt(2025, 10, 1)
        );
    }

    #[tokio::test]
    async fn test_receive_rejects_invalid_form_without_storing() {
        let (_temp, service) = service();
        let mut command = valid_command();
        command.quantity_received = Some(0);
        let error = service.receive(command).await.unwrap_err();
        match error {
            ReceivingError::Validation(errors) => {
                assert_eq!(errors, vec![VaccineValidationError::ZeroQuantityReceived]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
