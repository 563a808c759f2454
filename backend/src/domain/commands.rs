//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod vaccines {
    use crate::domain::models::vaccine::{SortKey, SortOrder};

    /// Input for receiving a shipment. Dates arrive as raw strings from the
    /// form and are validated before any lot is created.
    #[derive(Debug, Clone, Default)]
    pub struct ReceiveVaccineCommand {
        pub commercial_name: String,
        pub generic_name: String,
        pub lot_number: String,
        pub quantity_received: Option<u32>,
        pub doses_passed: Option<u32>,
        pub doses_failed: Option<u32>,
        pub discrepancy_reason: Option<String>,
        pub expiration_date: Option<String>,
        pub received_date: Option<String>,
    }

    /// Input for editing an existing lot. Absent fields stay untouched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateVaccineCommand {
        pub commercial_name: Option<String>,
        pub generic_name: Option<String>,
        pub lot_number: Option<String>,
        pub quantity_on_hand: Option<u32>,
        pub expiration_date: Option<String>,
        pub received_date: Option<String>,
    }

    /// Input for recording administered doses against a lot.
    #[derive(Debug, Clone)]
    pub struct AdministerDosesCommand {
        pub vaccine_id: i64,
        pub doses: u32,
    }

    /// Query parameters for listing the inventory.
    #[derive(Debug, Clone, Default)]
    pub struct VaccineListQuery {
        pub search: Option<String>,
        pub sort_by: Option<SortKey>,
        pub sort_order: Option<SortOrder>,
        /// When set, only lots with at least one dose on hand
        pub available_only: bool,
    }

    /// Headline numbers for the dashboard.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DashboardSummaryResult {
        pub total_doses_on_hand: u64,
        pub total_administered_doses: u64,
        pub expiring_soon_count: usize,
        pub expired_count: usize,
        pub low_stock_count: usize,
        pub out_of_stock_count: usize,
        pub vaccines_to_order_count: usize,
    }
}

pub mod settings {
    /// Partial update of facility settings. Absent fields keep their value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateSettingsCommand {
        pub facility_name: Option<String>,
        pub low_stock_threshold: Option<u32>,
        pub expiration_warning_days: Option<u32>,
        pub auto_backup: Option<bool>,
        pub email_notifications: Option<bool>,
        pub sms_notifications: Option<bool>,
        pub reporting_frequency: Option<String>,
    }
}

pub mod authorization {
    /// Input for an edit-authorization check.
    #[derive(Debug, Clone)]
    pub struct AuthorizeEditCommand {
        pub credential: String,
    }

    /// Outcome of an authorization check, with a user-facing message.
    #[derive(Debug, Clone)]
    pub struct AuthorizeEditResult {
        pub success: bool,
        pub message: String,
    }
}
