//! Edit authorization: gate for inventory edits, with an audit trail.
//!
//! The check itself sits behind [`IdentityVerifier`] so the credential
//! source can change (environment today, a directory service tomorrow)
//! without touching the audit or transport layers.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::authorization::{AuthorizeEditCommand, AuthorizeEditResult};
use crate::domain::models::audit::EditAttempt;
use crate::storage::traits::AuditStorage;

/// Environment variable the default production verifier reads
pub const CREDENTIAL_ENV_VAR: &str = "VAXTRACK_EDIT_CREDENTIAL";

/// Decides whether a presented credential authorizes inventory edits
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> bool;
}

/// Verifier backed by one externally configured credential
pub struct ConfiguredCredentialVerifier {
    credential: String,
}

impl ConfiguredCredentialVerifier {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
        }
    }

    /// Read the credential from the environment. Absent configuration means
    /// no credential authorizes anything.
    pub fn from_env() -> Self {
        let credential = std::env::var(CREDENTIAL_ENV_VAR).unwrap_or_default();
        if credential.is_empty() {
            warn!(
                "{} is not set, all edit authorization attempts will be denied",
                CREDENTIAL_ENV_VAR
            );
        }
        Self { credential }
    }
}

impl IdentityVerifier for ConfiguredCredentialVerifier {
    fn verify(&self, credential: &str) -> bool {
        !self.credential.is_empty() && credential == self.credential
    }
}

/// Service for authorizing privileged edits
#[derive(Clone)]
pub struct AuthorizationService {
    verifier: Arc<dyn IdentityVerifier>,
    audit_storage: Arc<dyn AuditStorage>,
}

impl AuthorizationService {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, audit_storage: Arc<dyn AuditStorage>) -> Self {
        Self {
            verifier,
            audit_storage,
        }
    }

    /// Check a credential and record the attempt. A failure to write the
    /// audit record is logged but does not block the answer.
    pub async fn authorize_edit(
        &self,
        command: AuthorizeEditCommand,
    ) -> Result<AuthorizeEditResult> {
        let success = self.verifier.verify(&command.credential);
        let now = Utc::now();

        let attempt = EditAttempt {
            id: now.timestamp_millis(),
            attempted_value: command.credential,
            timestamp: now.to_rfc3339(),
            success,
        };
        if let Err(err) = self.audit_storage.record_attempt(&attempt).await {
            warn!("Failed to record edit authorization attempt: {:#}", err);
        }

        let result = if success {
            info!("Edit authorization granted");
            AuthorizeEditResult {
                success: true,
                message: "Edit access granted.".to_string(),
            }
        } else {
            info!("Edit authorization denied");
            AuthorizeEditResult {
                success: false,
                message: "Incorrect credential. Access denied.".to_string(),
            }
        };
        Ok(result)
    }

    /// Recent attempts, most recent first
    pub async fn recent_attempts(&self, limit: Option<usize>) -> Result<Vec<EditAttempt>> {
        let mut attempts = self.audit_storage.list_attempts().await?;
        if let Some(limit) = limit {
            attempts.truncate(limit);
        }
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::audit_repository::AuditRepository;
    use crate::storage::csv::connection::CsvConnection;
    use tempfile::TempDir;

    fn service(credential: &str) -> (TempDir, AuthorizationService) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        let repository = Arc::new(AuditRepository::new(connection));
        let verifier = Arc::new(ConfiguredCredentialVerifier::new(credential));
        (temp, AuthorizationService::new(verifier, repository))
    }

    #[tokio::test]
    async fn test_correct_credential_is_granted_and_recorded() {
        let (_temp, service) = service("open sesame");
        let result = service
            .authorize_edit(AuthorizeEditCommand {
                credential: "open sesame".to_string(),
            })
            .await
            .unwrap();
        assert!(result.success);

        let attempts = service.recent_attempts(None).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].success);
    }

    #[tokio::test]
    async fn test_wrong_credential_is_denied_but_still_recorded() {
        let (_temp, service) = service("open sesame");
        let result = service
            .authorize_edit(AuthorizeEditCommand {
                credential: "guess".to_string(),
            })
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Incorrect credential. Access denied.");

        let attempts = service.recent_attempts(None).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert!(!attempts[0].success);
        assert_eq!(attempts[0].attempted_value, "guess");
    }

    #[tokio::test]
    async fn test_empty_configured_credential_denies_everything() {
        let (_temp, service) = service("");
        let result = service
            .authorize_edit(AuthorizeEditCommand {
                credential: "".to_string(),
            })
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_recent_attempts_respects_limit() {
        let (_temp, service) = service("open sesame");
        for guess in ["a", "b", "c"] {
            service
                .authorize_edit(AuthorizeEditCommand {
                    credential: guess.to_string(),
                })
                .await
                .unwrap();
        }
        let attempts = service.recent_attempts(Some(2)).await.unwrap();
        assert_eq!(attempts.len(), 2);
    }
}
