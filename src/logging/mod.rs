//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output on stderr
//! - JSON file logging with rotation
//!
//! Entity text is never logged above `debug`.
//!
//! # Example
//!
//! ```no_run
//! use legalscan::logging::init_logging;
//! use legalscan::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use legalscan::log_error_with_context;
/// use legalscan::domain::LegalScanError;
///
/// let error = LegalScanError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a summary of the rule sets a store can serve
///
/// # Example
///
/// ```no_run
/// use legalscan::log_rule_summary;
///
/// let doc_types = vec!["contract".to_string(), "general".to_string()];
/// log_rule_summary!("builtin", &doc_types);
/// ```
#[macro_export]
macro_rules! log_rule_summary {
    ($source:expr, $doc_types:expr) => {
        tracing::info!(
            source = $source,
            doc_types = $doc_types.len(),
            names = %$doc_types.join(","),
            "Rule sets available"
        );
    };
}
