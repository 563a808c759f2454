//! Audit record for edit-authorization checks.

/// One recorded attempt to authorize a privileged edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditAttempt {
    pub id: i64,
    /// The credential as presented. Kept for audit, never logged at info level.
    pub attempted_value: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub success: bool,
}
