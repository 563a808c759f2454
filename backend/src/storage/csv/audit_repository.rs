//! # CSV Audit Repository
//!
//! Append-only trail of edit authorization attempts in
//! `edit_attempts.csv`.
//!
//! ## CSV Format
//!
//! ```csv
//! id,attempted_value,timestamp,success
//! 1705312200000,wrong-guess,2024-01-15T10:30:00+00:00,false
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::connection::CsvConnection;
use crate::domain::models::audit::EditAttempt;
use crate::storage::traits::AuditStorage;

/// CSV record structure for edit attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EditAttemptRecord {
    id: i64,
    attempted_value: String,
    timestamp: String,
    success: bool,
}

impl From<&EditAttempt> for EditAttemptRecord {
    fn from(attempt: &EditAttempt) -> Self {
        Self {
            id: attempt.id,
            attempted_value: attempt.attempted_value.clone(),
            timestamp: attempt.timestamp.clone(),
            success: attempt.success,
        }
    }
}

impl From<EditAttemptRecord> for EditAttempt {
    fn from(record: EditAttemptRecord) -> Self {
        EditAttempt {
            id: record.id,
            attempted_value: record.attempted_value,
            timestamp: record.timestamp,
            success: record.success,
        }
    }
}

/// CSV-backed audit trail repository
#[derive(Clone)]
pub struct AuditRepository {
    connection: Arc<CsvConnection>,
    write_lock: Arc<Mutex<()>>,
}

impl AuditRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn load_all(&self) -> Result<Vec<EditAttempt>> {
        let path = self.connection.edit_attempts_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .from_path(&path)
            .with_context(|| format!("could not open {}", path.display()))?;
        let mut attempts = Vec::new();
        for record in reader.deserialize::<EditAttemptRecord>() {
            let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
            attempts.push(record.into());
        }
        Ok(attempts)
    }

    fn save_all(&self, attempts: &[EditAttempt]) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for attempt in attempts {
            writer.serialize(EditAttemptRecord::from(attempt))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("could not flush CSV buffer: {}", err.error()))?;
        let contents = String::from_utf8(bytes).context("CSV output was not UTF-8")?;
        self.connection
            .write_atomically(&self.connection.edit_attempts_file(), &contents)
    }
}

#[async_trait]
impl AuditStorage for AuditRepository {
    async fn record_attempt(&self, attempt: &EditAttempt) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        let mut attempts = self.load_all()?;
        attempts.push(attempt.clone());
        self.save_all(&attempts)
    }

    async fn list_attempts(&self) -> Result<Vec<EditAttempt>> {
        let mut attempts = self.load_all()?;
        attempts.reverse();
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository() -> (TempDir, AuditRepository) {
        let temp = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp.path()));
        (temp, AuditRepository::new(connection))
    }

    fn attempt(id: i64, value: &str, success: bool) -> EditAttempt {
        EditAttempt {
            id,
            attempted_value: value.to_string(),
            timestamp: format!("2024-01-15T10:30:0{id}+00:00"),
            success,
        }
    }

    #[tokio::test]
    async fn test_attempts_list_most_recent_first() {
        let (_temp, repository) = repository();
        repository.record_attempt(&attempt(1, "first", false)).await.unwrap();
        repository.record_attempt(&attempt(2, "second", true)).await.unwrap();

        let attempts = repository.list_attempts().await.unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].attempted_value, "second");
        assert!(attempts[0].success);
        assert_eq!(attempts[1].attempted_value, "first");
    }

    #[tokio::test]
    async fn test_empty_trail_lists_nothing() {
        let (_temp, repository) = repository();
        assert!(repository.list_attempts().await.unwrap().is_empty());
    }
}
