//! Facility-wide settings.

use serde::{Deserialize, Serialize};

/// Process-wide configuration, loaded at startup and persisted on change.
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
