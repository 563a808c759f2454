//! Inventory queries, lot edits, and the dose administration transaction.

use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::aggregation;
use crate::domain::classification::parse_date;
use crate::domain::commands::vaccines::{
    AdministerDosesCommand, DashboardSummaryResult, UpdateVaccineCommand, VaccineListQuery,
};
use crate::domain::models::vaccine::VaccineLot;
use crate::domain::receiving_service::VaccineValidationError;
use crate::storage::traits::VaccineStorage;

#[derive(Debug, Error)]
pub enum AdministerError {
    #[error("Please enter a valid number of doses to administer")]
    InvalidDoseCount,
    #[error("Cannot administer more doses than available in stock")]
    InsufficientStock,
    #[error("Vaccine lot {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("vaccine update failed validation")]
    Validation(Vec<VaccineValidationError>),
    #[error("Vaccine lot {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Service for querying and mutating the lot inventory
#[derive(Clone)]
pub struct InventoryService {
    vaccine_storage: Arc<dyn VaccineStorage>,
}

impl InventoryService {
    pub fn new(vaccine_storage: Arc<dyn VaccineStorage>) -> Self {
        Self { vaccine_storage }
    }

    /// List lots with optional search, availability filter, and sorting
    pub async fn list_vaccines(&self, query: VaccineListQuery) -> Result<Vec<VaccineLot>> {
        let mut lots = self.vaccine_storage.list_vaccines().await?;

        if let Some(term) = query.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                lots.retain(|lot| lot.matches_search(term));
            }
        }
        if query.available_only {
            lots.retain(|lot| lot.quantity_on_hand > 0);
        }
        if let Some(key) = query.sort_by {
            aggregation::sort_lots(&mut lots, key, query.sort_order.unwrap_or_default());
        }

        info!("Listed {} vaccine lot(s)", lots.len());
        Ok(lots)
    }

    pub async fn get_vaccine(&self, id: i64) -> Result<Option<VaccineLot>> {
        let lot = self.vaccine_storage.get_vaccine(id).await?;
        if lot.is_none() {
            warn!("Vaccine lot not found: {}", id);
        }
        Ok(lot)
    }

    /// Apply a partial edit to a lot. Supplied fields are validated the same
    /// way the receiving form validates them; absent fields keep their value.
    pub async fn update_vaccine(
        &self,
        id: i64,
        command: UpdateVaccineCommand,
    ) -> Result<VaccineLot, UpdateError> {
        let errors = validate_update(&command);
        if !errors.is_empty() {
            return Err(UpdateError::Validation(errors));
        }

        let mut lot = self
            .vaccine_storage
            .get_vaccine(id)
            .await?
            .ok_or(UpdateError::NotFound(id))?;

        if let Some(name) = command.commercial_name {
            lot.commercial_name = name.trim().to_string();
        }
        if let Some(name) = command.generic_name {
            lot.generic_name = name.trim().to_string();
        }
        if let Some(number) = command.lot_number {
            lot.lot_number = number.trim().to_string();
        }
        if let Some(quantity) = command.quantity_on_hand {
            lot.quantity_on_hand = quantity;
        }
        if let Some(raw) = command.expiration_date.as_deref() {
            lot.expiration_date = parse_date(raw);
        }
        if let Some(raw) = command.received_date.as_deref() {
            lot.received_date = parse_date(raw);
        }

        if !self.vaccine_storage.update_vaccine(&lot).await? {
            return Err(UpdateError::NotFound(id));
        }
        info!("Updated vaccine lot {}", id);
        Ok(lot)
    }

    /// Record administered doses against a lot. The on-hand count and the
    /// administered total move together in one stored update, so the books
    /// always balance.
    pub async fn administer_doses(
        &self,
        command: AdministerDosesCommand,
    ) -> Result<VaccineLot, AdministerError> {
        if command.doses == 0 {
            return Err(AdministerError::InvalidDoseCount);
        }

        let mut lot = self
            .vaccine_storage
            .get_vaccine(command.vaccine_id)
            .await?
            .ok_or(AdministerError::NotFound(command.vaccine_id))?;

        if command.doses > lot.quantity_on_hand {
            warn!(
                "Refusing to administer {} doses from lot {} with {} on hand",
                command.doses, lot.id, lot.quantity_on_hand
            );
            return Err(AdministerError::InsufficientStock);
        }

        lot.quantity_on_hand -= command.doses;
        lot.administered_doses += command.doses;

        if !self.vaccine_storage.update_vaccine(&lot).await? {
            return Err(AdministerError::NotFound(command.vaccine_id));
        }
        info!(
            "Administered {} dose(s) from lot {}: {} remaining",
            command.doses, lot.id, lot.quantity_on_hand
        );
        Ok(lot)
    }

    /// Headline numbers for the dashboard, classified against the current
    /// local date and the configured low-stock threshold.
    pub async fn dashboard_summary(
        &self,
        low_stock_threshold: u32,
    ) -> Result<DashboardSummaryResult> {
        let lots = self.vaccine_storage.list_vaccines().await?;
        let today = Local::now().date_naive();

        Ok(DashboardSummaryResult {
            total_doses_on_hand: aggregation::total_doses_on_hand(&lots),
            total_administered_doses: aggregation::total_administered_doses(&lots),
            expiring_soon_count: aggregation::expiring_lots(&lots, today).len(),
            expired_count: aggregation::expired_lots(&lots, today).len(),
            low_stock_count: aggregation::low_stock_lots(&lots, low_stock_threshold).len(),
            out_of_stock_count: aggregation::out_of_stock_lots(&lots).len(),
            vaccines_to_order_count: aggregation::vaccines_to_order(&lots).len(),
        })
    }
}

fn validate_update(command: &UpdateVaccineCommand) -> Vec<VaccineValidationError> {
    let mut errors = Vec::new();

    if command
        .commercial_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        errors.push(VaccineValidationError::MissingCommercialName);
    }
    if command
        .generic_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        errors.push(VaccineValidationError::MissingGenericName);
    }
    if command
        .lot_number
        .as_deref()
        .is_some_and(|number| number.trim().is_empty())
    {
        errors.push(VaccineValidationError::MissingLotNumber);
    }
    if let Some(raw) = command.expiration_date.as_deref().map(str::trim) {
        if !raw.is_empty() && parse_date(raw).is_none() {
            errors.push(VaccineValidationError::InvalidExpirationDate {
                value: raw.to_string(),
            });
        }
    }
    if let Some(raw) = command.received_date.as_deref().map(str::trim) {
        if !raw.is_empty() && parse_date(raw).is_none() {
            errors.push(VaccineValidationError::InvalidReceivedDate {
                value: raw.to_string(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::vaccine::{NewVaccineLot, SortKey, SortOrder};
    use crate::storage::csv::connection::CsvConnection;
    use crate::storage::csv::vaccine_repository::VaccineRepository;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn service() -> (TempDir, InventoryService) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        let repository = Arc::new(VaccineRepository::new(connection));
        (temp, InventoryService::new(repository))
    }

    fn new_lot(commercial: &str, generic: &str, on_hand: u32) -> NewVaccineLot {
        // Classification runs against the real current date, so keep the
        // expiration comfortably in the future
        NewVaccineLot {
            commercial_name: commercial.to_string(),
            generic_name: generic.to_string(),
            lot_number: format!("{commercial}-LOT"),
            quantity_received: on_hand,
            quantity_on_hand: on_hand,
            administered_doses: 0,
            expiration_date: Some(Local::now().date_naive() + Duration::days(365)),
            received_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        }
    }

    async fn seed(service: &InventoryService, lots: &[NewVaccineLot]) -> Vec<VaccineLot> {
        let mut stored = Vec::new();
        for lot in lots {
            stored.push(service.vaccine_storage.store_vaccine(lot).await.unwrap());
        }
        stored
    }

    #[tokio::test]
    async fn test_administer_moves_doses_from_on_hand_to_administered() {
        let (_temp, service) = service();
        let stored = seed(&service, &[new_lot("Varivax", "Varicella", 5)]).await;

        let updated = service
            .administer_doses(AdministerDosesCommand {
                vaccine_id: stored[0].id,
                doses: 3,
            })
            .await
            .unwrap();

        assert_eq!(updated.quantity_on_hand, 2);
        assert_eq!(updated.administered_doses, 3);

        let reloaded = service.get_vaccine(stored[0].id).await.unwrap().unwrap();
        assert_eq!(reloaded.quantity_on_hand, 2);
        assert_eq!(reloaded.administered_doses, 3);
    }

    #[tokio::test]
    async fn test_administer_rejects_more_than_on_hand() {
        let (_temp, service) = service();
        let stored = seed(&service, &[new_lot("Varivax", "Varicella", 5)]).await;

        let error = service
            .administer_doses(AdministerDosesCommand {
                vaccine_id: stored[0].id,
                doses: 6,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AdministerError::InsufficientStock));
        assert_eq!(
            error.to_string(),
            "Cannot administer more doses than available in stock"
        );

        // Nothing changed
        let reloaded = service.get_vaccine(stored[0].id).await.unwrap().unwrap();
        assert_eq!(reloaded.quantity_on_hand, 5);
        assert_eq!(reloaded.administered_doses, 0);
    }

    #[tokio::test]
    async fn test_administer_rejects_zero_doses() {
        let (_temp, service) = service();
        let stored = seed(&service, &[new_lot("Varivax", "Varicella", 5)]).await;

        let error = service
            .administer_doses(AdministerDosesCommand {
                vaccine_id: stored[0].id,
                doses: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AdministerError::InvalidDoseCount));
        assert_eq!(
            error.to_string(),
            "Please enter a valid number of doses to administer"
        );
    }

    #[tokio::test]
    async fn test_administer_unknown_lot_is_not_found() {
        let (_temp, service) = service();
        let error = service
            .administer_doses(AdministerDosesCommand {
                vaccine_id: 42,
                doses: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AdministerError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_list_with_search_and_availability_filter() {
        let (_temp, service) = service();
        let mut empty = new_lot("Daptacel SDV", "DTaP", 0);
        empty.quantity_on_hand = 0;
        seed(
            &service,
            &[empty, new_lot("Daptacel SDV", "DTaP", 4), new_lot("Varivax", "Varicella", 9)],
        )
        .await;

        let found = service
            .list_vaccines(VaccineListQuery {
                search: Some("daptacel".to_string()),
                available_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].quantity_on_hand, 4);
    }

    #[tokio::test]
    async fn test_list_sorted_descending_by_quantity() {
        let (_temp, service) = service();
        seed(
            &service,
            &[new_lot("Daptacel SDV", "DTaP", 4), new_lot("Varivax", "Varicella", 9)],
        )
        .await;

        let lots = service
            .list_vaccines(VaccineListQuery {
                sort_by: Some(SortKey::QuantityOnHand),
                sort_order: Some(SortOrder::Descending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(lots[0].commercial_name, "Varivax");
    }

    #[tokio::test]
    async fn test_update_applies_only_supplied_fields() {
        let (_temp, service) = service();
        let stored = seed(&service, &[new_lot("Varivax", "Varicella", 5)]).await;

        let updated = service
            .update_vaccine(
                stored[0].id,
                UpdateVaccineCommand {
                    quantity_on_hand: Some(8),
                    expiration_date: Some("2026-01-01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.commercial_name, "Varivax");
        assert_eq!(updated.quantity_on_hand, 8);
        assert_eq!(updated.expiration_date, NaiveDate::from_ymd_opt(2026, 1, 1));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let (_temp, service) = service();
        let stored = seed(&service, &[new_lot("Varivax", "Varicella", 5)]).await;

        let error = service
            .update_vaccine(
                stored[0].id,
                UpdateVaccineCommand {
                    commercial_name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        match error {
            UpdateError::Validation(errors) => {
                assert_eq!(errors, vec![VaccineValidationError::MissingCommercialName]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dashboard_summary_counts() {
        let (_temp, service) = service();
        let mut expired = new_lot("Adacel", "Tdap", 10);
        expired.expiration_date = Some(Local::now().date_naive() - Duration::days(100));
        let mut empty = new_lot("Havrix", "HepA", 0);
        empty.quantity_on_hand = 0;
        seed(
            &service,
            &[
                expired,
                empty,
                new_lot("Daptacel SDV", "DTaP", 3),
                new_lot("Varivax", "Varicella", 20),
            ],
        )
        .await;

        let summary = service.dashboard_summary(5).await.unwrap();
        assert_eq!(summary.total_doses_on_hand, 33);
        assert_eq!(summary.expired_count, 1);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.low_stock_count, 1);
        // Havrix (0) and Daptacel (3) fall under the order threshold of 7
        assert_eq!(summary.vaccines_to_order_count, 2);
    }
}
