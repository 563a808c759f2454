//! Domain model for vaccine lots.

use chrono::NaiveDate;

/// One received shipment lot of a vaccine.
///
/// `quantity_on_hand` can never go below zero (enforced by the type) and
/// `administered_doses` only increases, via the administration transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct VaccineLot {
    pub id: i64,
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: String,
    /// Doses in the shipment as received, before quality inspection
    pub quantity_received: u32,
    pub quantity_on_hand: u32,
    pub administered_doses: u32,
    /// `None` when the stored value is absent or unparseable
    pub expiration_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
}

impl VaccineLot {
    /// Case-insensitive match against commercial name, generic name, or lot number
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.commercial_name.to_lowercase().contains(&term)
            || self.generic_name.to_lowercase().contains(&term)
            || self.lot_number.to_lowercase().contains(&term)
    }
}

/// A lot before the repository has assigned an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewVaccineLot {
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: String,
    pub quantity_received: u32,
    pub quantity_on_hand: u32,
    pub administered_doses: u32,
    pub expiration_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
}

/// Derived view: all lots sharing a (commercial name, generic name) pair,
/// summed. Never persisted; recomputed on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedVaccine {
    /// Representative id from the first lot seen in the group
    pub id: i64,
    pub commercial_name: String,
    pub generic_name: String,
    pub quantity_on_hand: u32,
    pub administered_doses: u32,
}

/// Accessors shared by lot-level and aggregated records so grouping can run
/// over either (aggregating an already-aggregated list must be a no-op).
pub trait VaccineRecord {
    fn record_id(&self) -> i64;
    fn commercial_name(&self) -> &str;
    fn generic_name(&self) -> &str;
    fn quantity_on_hand(&self) -> u32;
    fn administered_doses(&self) -> u32;
}

impl VaccineRecord for VaccineLot {
    fn record_id(&self) -> i64 {
        self.id
    }
    fn commercial_name(&self) -> &str {
        &self.commercial_name
    }
    fn generic_name(&self) -> &str {
        &self.generic_name
    }
    fn quantity_on_hand(&self) -> u32 {
        self.quantity_on_hand
    }
    fn administered_doses(&self) -> u32 {
        self.administered_doses
    }
}

impl VaccineRecord for AggregatedVaccine {
    fn record_id(&self) -> i64 {
        self.id
    }
    fn commercial_name(&self) -> &str {
        &self.commercial_name
    }
    fn generic_name(&self) -> &str {
        &self.generic_name
    }
    fn quantity_on_hand(&self) -> u32 {
        self.quantity_on_hand
    }
    fn administered_doses(&self) -> u32 {
        self.administered_doses
    }
}

/// Sortable columns of the inventory table and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CommercialName,
    GenericName,
    LotNumber,
    ExpirationDate,
    ReceivedDate,
    QuantityOnHand,
    AdministeredDoses,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "commercial_name" => Some(Self::CommercialName),
            "generic_name" => Some(Self::GenericName),
            "lot_number" => Some(Self::LotNumber),
            "expiration_date" => Some(Self::ExpirationDate),
            "received_date" => Some(Self::ReceivedDate),
            "quantity_on_hand" => Some(Self::QuantityOnHand),
            "administered_doses" => Some(Self::AdministeredDoses),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> VaccineLot {
        VaccineLot {
            id: 1,
            commercial_name: "Daptacel SDV".to_string(),
            generic_name: "DTaP".to_string(),
            lot_number: "3CA03C3".to_string(),
            quantity_received: 10,
            quantity_on_hand: 7,
            administered_doses: 0,
            expiration_date: NaiveDate::from_ymd_opt(2025, 10, 1),
            received_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        }
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let lot = lot();
        assert!(lot.matches_search("daptacel"));
        assert!(lot.matches_search("dtap"));
        assert!(lot.matches_search("3ca03"));
        assert!(!lot.matches_search("varivax"));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(
            SortKey::parse("commercial_name"),
            Some(SortKey::CommercialName)
        );
        assert_eq!(SortKey::parse("quantity_on_hand"), Some(SortKey::QuantityOnHand));
        assert_eq!(SortKey::parse("bogus"), None);
    }

    #[test]
    fn test_sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::default(), SortOrder::Ascending);
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("sideways"), None);
    }
}
