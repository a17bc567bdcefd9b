//! Audit logger for anonymization runs

use crate::anonymization::models::{AnonymizationResult, ResolvedEntity};
use crate::domain::{LegalScanError, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: String,
    doc_type: String,
    entity_count: usize,
    processing_time_ms: u64,
    entities: Vec<AuditEntity>,
}

/// Audit entity entry (with hashed text)
#[derive(Debug, Serialize)]
struct AuditEntity {
    kind: String,
    label: String,
    /// SHA-256 hash of the entity text (never log plaintext)
    value_hash: String,
}

/// Audit logger for anonymization runs
///
/// Writes are serialized so concurrent runs never interleave lines.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory if needed
    pub fn new(log_path: impl Into<PathBuf>, json_format: bool) -> Result<Self> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LegalScanError::Audit(format!(
                        "Failed to create audit log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record one pipeline run; returns the generated run id
    pub fn log_run(&self, result: &AnonymizationResult, processing_time_ms: u64) -> Result<Uuid> {
        let run_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            run_id: run_id.to_string(),
            doc_type: result.doc_type.clone(),
            entity_count: result.entities.len(),
            processing_time_ms,
            entities: result.entities.iter().map(audit_entity).collect(),
        };

        self.write_entry(&entry)?;
        Ok(run_id)
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] Run: {} | Doc type: {} | Entities: {} | Time: {}ms",
                entry.timestamp,
                entry.run_id,
                entry.doc_type,
                entry.entity_count,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| LegalScanError::Audit("Audit log lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                LegalScanError::Audit(format!(
                    "Failed to open audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;
        writeln!(file, "{line}")
            .map_err(|e| LegalScanError::Audit(format!("Failed to write audit entry: {e}")))?;

        Ok(())
    }
}

fn audit_entity(entity: &ResolvedEntity) -> AuditEntity {
    AuditEntity {
        kind: entity.kind.to_string(),
        label: entity.label.clone(),
        value_hash: hash_value(&entity.text),
    }
}

/// Hash an entity value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntityKind;
    use tempfile::tempdir;

    fn sample_result() -> AnonymizationResult {
        AnonymizationResult {
            doc_type: "contract".to_string(),
            redacted_text: "[[PERSON]] подписал".to_string(),
            entities: vec![ResolvedEntity::new(EntityKind::Person, "PERSON", "Иванов Иван Иванович")],
        }
    }

    #[test]
    fn test_hash_value() {
        assert_eq!(hash_value("Иванов"), hash_value("Иванов"));
        assert_ne!(hash_value("Иванов"), hash_value("Петров"));
        assert_eq!(hash_value("").len(), 64);
    }

    #[test]
    fn test_log_run_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit").join("runs.log");
        let logger = AuditLogger::new(&log_path, true).unwrap();

        let run_id = logger.log_run(&sample_result(), 12).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(line["run_id"], run_id.to_string());
        assert_eq!(line["doc_type"], "contract");
        assert_eq!(line["entities"][0]["label"], "PERSON");
        // Should NOT contain plaintext entity text
        assert!(!content.contains("Иванов"));
    }

    #[test]
    fn test_log_run_text_appends() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("runs.log");
        let logger = AuditLogger::new(&log_path, false).unwrap();

        logger.log_run(&sample_result(), 1).unwrap();
        logger.log_run(&sample_result(), 2).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Doc type: contract | Entities: 1"));
    }
}
