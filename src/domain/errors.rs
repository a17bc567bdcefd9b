//! Domain error types
//!
//! This module defines the error hierarchy for LegalScan. Only a handful of
//! conditions are fatal to an anonymization run; the recoverable kinds
//! ([`ExtractionError`], [`TaggerError`]) are logged by the pipeline and
//! degrade to "fewer entities found".

use thiserror::Error;

/// Main LegalScan error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum LegalScanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A rule definition violates the rule schema
    ///
    /// This is the only extraction-side condition that aborts a run.
    #[error("Invalid rule schema for doc type '{doc_type}' (entry {entry}): {reason}")]
    RuleSchema {
        doc_type: String,
        entry: String,
        reason: String,
    },

    /// Input rejected before processing because it exceeds the configured limit
    #[error("Input too large: {len} characters exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    /// Audit trail errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl LegalScanError {
    /// Creates a rule schema error for the given doc type and rule entry
    pub fn rule_schema(
        doc_type: impl Into<String>,
        entry: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LegalScanError::RuleSchema {
            doc_type: doc_type.into(),
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}

/// Pattern extraction errors
///
/// Always recovered: the offending pattern is skipped and extraction
/// continues with the remaining patterns.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Pattern could not be compiled by any supported engine
    #[error("Invalid pattern for {kind}: {pattern}: {reason}")]
    InvalidPattern {
        kind: String,
        pattern: String,
        reason: String,
    },

    /// Pattern failed while matching (e.g. backtrack limit exceeded)
    #[error("Pattern execution failed for {kind}: {pattern}: {reason}")]
    PatternExecution {
        kind: String,
        pattern: String,
        reason: String,
    },
}

/// Statistical tagger errors
///
/// Always recovered: the run continues with rule-based candidates only.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// The tagger capability is not loaded or cannot be accessed
    #[error("Tagger unavailable: {0}")]
    Unavailable(String),

    /// The tagger failed on this input
    #[error("Tagger failed: {0}")]
    Failed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for LegalScanError {
    fn from(err: std::io::Error) -> Self {
        LegalScanError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LegalScanError {
    fn from(err: serde_json::Error) -> Self {
        LegalScanError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LegalScanError {
    fn from(err: toml::de::Error) -> Self {
        LegalScanError::Configuration(format!("TOML parse error: {err}"))
    }
}
