//! Report projections over the lot inventory.
//!
//! Reports come in two shapes: lot-level listings and per-vaccine aggregate
//! listings. The ordering reports work on aggregates because a vaccine that
//! is well stocked across several small lots does not need reordering.

use anyhow::Result;
use chrono::Local;
use log::info;
use std::sync::Arc;

use crate::domain::aggregation;
use crate::domain::classification::{stock_status, StockStatus};
use crate::domain::models::vaccine::{AggregatedVaccine, SortKey, SortOrder, VaccineLot};
use crate::storage::traits::VaccineStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    CurrentInventory,
    ExpiringSoon,
    Expired,
    LowStock,
    OutOfStock,
    Orders,
    VaccinesToOrder,
    AdministrationSummary,
    InventoryTemplate,
}

impl ReportType {
    pub const ALL: [ReportType; 9] = [
        Self::CurrentInventory,
        Self::ExpiringSoon,
        Self::Expired,
        Self::LowStock,
        Self::OutOfStock,
        Self::Orders,
        Self::VaccinesToOrder,
        Self::AdministrationSummary,
        Self::InventoryTemplate,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current-inventory" => Some(Self::CurrentInventory),
            "expiring-soon" => Some(Self::ExpiringSoon),
            "expired" => Some(Self::Expired),
            "low-stock" => Some(Self::LowStock),
            "out-of-stock" => Some(Self::OutOfStock),
            "orders" => Some(Self::Orders),
            "vaccines-to-order" => Some(Self::VaccinesToOrder),
            "administration-summary" => Some(Self::AdministrationSummary),
            "vaccine-inventory-template" => Some(Self::InventoryTemplate),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::CurrentInventory => "current-inventory",
            Self::ExpiringSoon => "expiring-soon",
            Self::Expired => "expired",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
            Self::Orders => "orders",
            Self::VaccinesToOrder => "vaccines-to-order",
            Self::AdministrationSummary => "administration-summary",
            Self::InventoryTemplate => "vaccine-inventory-template",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CurrentInventory => "Current Inventory Report",
            Self::ExpiringSoon => "Vaccines Expiring Soon (30 Days)",
            Self::Expired => "Expired Vaccines Report",
            Self::LowStock => "Low Stock Report",
            Self::OutOfStock => "Out of Stock Report",
            Self::Orders => "Orders Report - Low/Out of Stock",
            Self::VaccinesToOrder => "Vaccines to Order (Less than 7 units)",
            Self::AdministrationSummary => "Administration Summary Report",
            Self::InventoryTemplate => "Vaccine Inventory Template",
        }
    }
}

/// Rows of a generated report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRows {
    Lots(Vec<VaccineLot>),
    Aggregates(Vec<AggregatedVaccine>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            ReportRows::Lots(lots) => lots.len(),
            ReportRows::Aggregates(aggregates) => aggregates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub report_type: ReportType,
    pub title: String,
    pub rows: ReportRows,
}

/// Service generating report projections from the stored lots
#[derive(Clone)]
pub struct ReportService {
    vaccine_storage: Arc<dyn VaccineStorage>,
}

impl ReportService {
    pub fn new(vaccine_storage: Arc<dyn VaccineStorage>) -> Self {
        Self { vaccine_storage }
    }

    /// Build one report, classified against the current local date and the
    /// configured low-stock threshold. Rows sort by commercial name.
    pub async fn generate(
        &self,
        report_type: ReportType,
        low_stock_threshold: u32,
    ) -> Result<Report> {
        let mut lots = self.vaccine_storage.list_vaccines().await?;
        aggregation::sort_lots(&mut lots, SortKey::CommercialName, SortOrder::Ascending);
        let today = Local::now().date_naive();

        let rows = match report_type {
            ReportType::CurrentInventory => ReportRows::Lots(lots),
            ReportType::ExpiringSoon => {
                ReportRows::Lots(aggregation::expiring_lots(&lots, today))
            }
            ReportType::Expired => ReportRows::Lots(aggregation::expired_lots(&lots, today)),
            ReportType::LowStock => {
                ReportRows::Lots(aggregation::low_stock_lots(&lots, low_stock_threshold))
            }
            ReportType::OutOfStock => ReportRows::Lots(aggregation::out_of_stock_lots(&lots)),
            ReportType::Orders => {
                let aggregates = aggregation::aggregate_by_name(&lots)
                    .into_iter()
                    .filter(|vaccine| {
                        stock_status(vaccine.quantity_on_hand, low_stock_threshold)
                            != StockStatus::InStock
                    })
                    .collect();
                ReportRows::Aggregates(aggregates)
            }
            ReportType::VaccinesToOrder => {
                ReportRows::Aggregates(aggregation::vaccines_to_order(&lots))
            }
            ReportType::AdministrationSummary => ReportRows::Lots(
                lots.into_iter()
                    .filter(|lot| lot.administered_doses > 0)
                    .collect(),
            ),
            ReportType::InventoryTemplate => {
                ReportRows::Lots(aggregation::unique_by_name(&lots))
            }
        };

        info!(
            "Generated {} report with {} row(s)",
            report_type.slug(),
            rows.len()
        );
        Ok(Report {
            report_type,
            title: report_type.title().to_string(),
            rows,
        })
    }
}
