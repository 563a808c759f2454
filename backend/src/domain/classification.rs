//! Stock and expiration classification rules.
//!
//! These are the rules every badge, alert, and report in the system agrees
//! on. All functions here are total: absent or malformed dates degrade to
//! [`ExpirationStatus::Unknown`] rather than failing.

use chrono::{Local, NaiveDate};
use std::fmt;

/// Default on-hand count at or below which a lot is flagged low stock
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Days ahead within which an expiration date counts as "expiring soon"
pub const EXPIRATION_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationStatus {
    Good,
    Expiring,
    Expired,
    Unknown,
}

impl ExpirationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationStatus::Good => "good",
            ExpirationStatus::Expiring => "expiring",
            ExpirationStatus::Expired => "expired",
            ExpirationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Combined badge status. Expiration dominates stock: an expired lot is
/// reported as expired no matter how well stocked it is, and stock badges
/// only show when the expiration status gives no cause for alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotStatus {
    Expired,
    ExpiringSoon,
    OutOfStock,
    LowStock,
    Good,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Expired => "expired",
            LotStatus::ExpiringSoon => "expiring",
            LotStatus::OutOfStock => "out-of-stock",
            LotStatus::LowStock => "low-stock",
            LotStatus::Good => "good",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an on-hand count against a low-stock threshold.
pub fn stock_status(quantity_on_hand: u32, low_stock_threshold: u32) -> StockStatus {
    if quantity_on_hand == 0 {
        StockStatus::OutOfStock
    } else if quantity_on_hand <= low_stock_threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Classify an expiration date relative to an explicit "today".
///
/// Expired strictly before today; expiring from today through the 30-day
/// boundary inclusive; absent dates are unknown.
pub fn expiration_status_as_of(
    expiration_date: Option<NaiveDate>,
    today: NaiveDate,
) -> ExpirationStatus {
    let Some(date) = expiration_date else {
        return ExpirationStatus::Unknown;
    };
    if date < today {
        ExpirationStatus::Expired
    } else if (date - today).num_days() <= EXPIRATION_WARNING_DAYS {
        ExpirationStatus::Expiring
    } else {
        ExpirationStatus::Good
    }
}

/// Classify an expiration date relative to the current local date.
pub fn expiration_status(expiration_date: Option<NaiveDate>) -> ExpirationStatus {
    expiration_status_as_of(expiration_date, Local::now().date_naive())
}

/// Signed days from `today` to the expiration date (negative once expired).
pub fn days_until_expiration_as_of(
    expiration_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<i64> {
    expiration_date.map(|date| (date - today).num_days())
}

/// Combined badge classification with expiration taking precedence.
///
/// An unknown expiration date falls through to the stock classification.
pub fn overall_status_as_of(
    quantity_on_hand: u32,
    expiration_date: Option<NaiveDate>,
    low_stock_threshold: u32,
    today: NaiveDate,
) -> LotStatus {
    match expiration_status_as_of(expiration_date, today) {
        ExpirationStatus::Expired => LotStatus::Expired,
        ExpirationStatus::Expiring => LotStatus::ExpiringSoon,
        ExpirationStatus::Good | ExpirationStatus::Unknown => {
            match stock_status(quantity_on_hand, low_stock_threshold) {
                StockStatus::OutOfStock => LotStatus::OutOfStock,
                StockStatus::LowStock => LotStatus::LowStock,
                StockStatus::InStock => LotStatus::Good,
            }
        }
    }
}

/// Combined badge classification relative to the current local date.
pub fn overall_status(
    quantity_on_hand: u32,
    expiration_date: Option<NaiveDate>,
    low_stock_threshold: u32,
) -> LotStatus {
    overall_status_as_of(
        quantity_on_hand,
        expiration_date,
        low_stock_threshold,
        Local::now().date_naive(),
    )
}

/// Lenient date parsing: plain ISO dates first, RFC 3339 timestamps second.
/// Anything else is treated as absent rather than an error.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .ok()
}

/// Display formatting for an already-parsed date (MM/DD/YYYY, or "N/A").
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Display formatting for a raw stored date string. Unlike [`parse_date`],
/// an unparseable value is reported explicitly instead of degrading to N/A.
pub fn format_date_str(value: Option<&str>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(raw) if raw.trim().is_empty() => "N/A".to_string(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date.format("%m/%d/%Y").to_string(),
            None => "Invalid Date".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(stock_status(0, 5), StockStatus::OutOfStock);
        assert_eq!(stock_status(1, 5), StockStatus::LowStock);
        assert_eq!(stock_status(5, 5), StockStatus::LowStock);
        assert_eq!(stock_status(6, 5), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_respects_custom_threshold() {
        assert_eq!(stock_status(7, 10), StockStatus::LowStock);
        assert_eq!(stock_status(11, 10), StockStatus::InStock);
    }

    #[test]
    fn test_expiration_status_windows() {
        let today = day(2024, 6, 15);
        assert_eq!(
            expiration_status_as_of(Some(day(2024, 6, 14)), today),
            ExpirationStatus::Expired
        );
        assert_eq!(
            expiration_status_as_of(Some(today), today),
            ExpirationStatus::Expiring
        );
        // 30-day boundary is inclusive
        assert_eq!(
            expiration_status_as_of(Some(day(2024, 7, 15)), today),
            ExpirationStatus::Expiring
        );
        assert_eq!(
            expiration_status_as_of(Some(day(2024, 7, 16)), today),
            ExpirationStatus::Good
        );
        assert_eq!(
            expiration_status_as_of(None, today),
            ExpirationStatus::Unknown
        );
    }

    #[test]
    fn test_expiration_dominates_stock() {
        let today = day(2024, 6, 15);
        // Well stocked but expired: reported expired
        assert_eq!(
            overall_status_as_of(100, Some(day(2024, 1, 1)), 5, today),
            LotStatus::Expired
        );
        // Expiring overrides the out-of-stock badge too
        assert_eq!(
            overall_status_as_of(0, Some(day(2024, 6, 20)), 5, today),
            LotStatus::ExpiringSoon
        );
    }

    #[test]
    fn test_stock_badges_only_when_expiration_is_clear() {
        let today = day(2024, 6, 15);
        let good_date = Some(day(2025, 6, 15));
        assert_eq!(
            overall_status_as_of(0, good_date, 5, today),
            LotStatus::OutOfStock
        );
        assert_eq!(
            overall_status_as_of(3, good_date, 5, today),
            LotStatus::LowStock
        );
        assert_eq!(
            overall_status_as_of(50, good_date, 5, today),
            LotStatus::Good
        );
        // Unknown expiration falls through to stock classification
        assert_eq!(overall_status_as_of(3, None, 5, today), LotStatus::LowStock);
    }

    #[test]
    fn test_days_until_expiration() {
        let today = day(2024, 6, 15);
        assert_eq!(
            days_until_expiration_as_of(Some(day(2024, 6, 25)), today),
            Some(10)
        );
        assert_eq!(
            days_until_expiration_as_of(Some(day(2024, 6, 10)), today),
            Some(-5)
        );
        assert_eq!(days_until_expiration_as_of(None, today), None);
    }

    #[test]
    fn test_parse_date_is_lenient() {
        assert_eq!(parse_date("2024-06-15"), Some(day(2024, 6, 15)));
        assert_eq!(
            parse_date("2024-06-15T10:30:00-04:00"),
            Some(day(2024, 6, 15))
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("06/15/2024"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(day(2024, 6, 5))), "06/05/2024");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_date_str_flags_garbage_explicitly() {
        assert_eq!(format_date_str(Some("2024-06-05")), "06/05/2024");
        assert_eq!(format_date_str(Some("garbage")), "Invalid Date");
        assert_eq!(format_date_str(Some("")), "N/A");
        assert_eq!(format_date_str(None), "N/A");
    }
}
