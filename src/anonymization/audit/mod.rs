//! Audit logging module
//!
//! Provides an append-only audit trail of anonymization runs. Entity values
//! are only ever recorded as SHA-256 hashes.

pub mod logger;

pub use logger::AuditLogger;
