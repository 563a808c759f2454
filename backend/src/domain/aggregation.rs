//! Grouping and summarizing of lots by vaccine name.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::classification;
use crate::domain::models::vaccine::{
    AggregatedVaccine, SortKey, SortOrder, VaccineLot, VaccineRecord,
};

/// Aggregated on-hand count below which a vaccine goes on the order list
pub const ORDER_THRESHOLD: u32 = 7;

/// Group records by their exact (commercial name, generic name) pair and sum
/// the quantities. Groups keep the order their first member appeared in, and
/// each carries the id of that first member as a representative.
///
/// Running this over its own output changes nothing.
pub fn aggregate_by_name<R: VaccineRecord>(records: &[R]) -> Vec<AggregatedVaccine> {
    let mut groups: Vec<AggregatedVaccine> = Vec::new();
    for record in records {
        let existing = groups.iter_mut().find(|group| {
            group.commercial_name == record.commercial_name()
                && group.generic_name == record.generic_name()
        });
        match existing {
            Some(group) => {
                group.quantity_on_hand += record.quantity_on_hand();
                group.administered_doses += record.administered_doses();
            }
            None => groups.push(AggregatedVaccine {
                id: record.record_id(),
                commercial_name: record.commercial_name().to_string(),
                generic_name: record.generic_name().to_string(),
                quantity_on_hand: record.quantity_on_hand(),
                administered_doses: record.administered_doses(),
            }),
        }
    }
    groups
}

/// Vaccines whose aggregated on-hand total has dropped below the order
/// threshold. A vaccine with lots of 4 and 3 doses totals 7 and stays off
/// the list.
pub fn vaccines_to_order(lots: &[VaccineLot]) -> Vec<AggregatedVaccine> {
    aggregate_by_name(lots)
        .into_iter()
        .filter(|vaccine| vaccine.quantity_on_hand < ORDER_THRESHOLD)
        .collect()
}

/// One lot per distinct (commercial name, generic name) pair, first seen
/// wins. Used by the blank inventory count sheet.
pub fn unique_by_name(lots: &[VaccineLot]) -> Vec<VaccineLot> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    lots.iter()
        .filter(|lot| {
            seen.insert((
                lot.commercial_name.clone(),
                lot.generic_name.clone(),
            ))
        })
        .cloned()
        .collect()
}

pub fn total_doses_on_hand(lots: &[VaccineLot]) -> u64 {
    lots.iter().map(|lot| lot.quantity_on_hand as u64).sum()
}

pub fn total_administered_doses(lots: &[VaccineLot]) -> u64 {
    lots.iter().map(|lot| lot.administered_doses as u64).sum()
}

pub fn expiring_lots(lots: &[VaccineLot], today: NaiveDate) -> Vec<VaccineLot> {
    lots.iter()
        .filter(|lot| {
            classification::expiration_status_as_of(lot.expiration_date, today)
                == classification::ExpirationStatus::Expiring
        })
        .cloned()
        .collect()
}

pub fn expired_lots(lots: &[VaccineLot], today: NaiveDate) -> Vec<VaccineLot> {
    lots.iter()
        .filter(|lot| {
            classification::expiration_status_as_of(lot.expiration_date, today)
                == classification::ExpirationStatus::Expired
        })
        .cloned()
        .collect()
}

/// Lots that are low but not empty. Empty lots belong on the out-of-stock
/// report instead.
pub fn low_stock_lots(lots: &[VaccineLot], threshold: u32) -> Vec<VaccineLot> {
    lots.iter()
        .filter(|lot| lot.quantity_on_hand > 0 && lot.quantity_on_hand <= threshold)
        .cloned()
        .collect()
}

pub fn out_of_stock_lots(lots: &[VaccineLot]) -> Vec<VaccineLot> {
    lots.iter()
        .filter(|lot| lot.quantity_on_hand == 0)
        .cloned()
        .collect()
}

/// Sort lots in place. String columns compare case-insensitively, dates
/// compare chronologically with absent dates first.
pub fn sort_lots(lots: &mut [VaccineLot], key: SortKey, order: SortOrder) {
    lots.sort_by(|a, b| {
        let ordering = match key {
            SortKey::CommercialName => a
                .commercial_name
                .to_lowercase()
                .cmp(&b.commercial_name.to_lowercase()),
            SortKey::GenericName => a
                .generic_name
                .to_lowercase()
                .cmp(&b.generic_name.to_lowercase()),
            SortKey::LotNumber => a
                .lot_number
                .to_lowercase()
                .cmp(&b.lot_number.to_lowercase()),
            SortKey::ExpirationDate => a.expiration_date.cmp(&b.expiration_date),
            SortKey::ReceivedDate => a.received_date.cmp(&b.received_date),
            SortKey::QuantityOnHand => a.quantity_on_hand.cmp(&b.quantity_on_hand),
            SortKey::AdministeredDoses => a.administered_doses.cmp(&b.administered_doses),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
