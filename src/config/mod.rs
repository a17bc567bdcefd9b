//! Configuration management for LegalScan.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! LegalScan uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `LEGALSCAN_*` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use legalscan::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("legalscan.toml")?;
//!
//! println!("Log level: {}", config.application.log_level);
//! println!("Default doc type: {}", config.anonymization.default_doc_type);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationConfig`] - Rules, tagger, limits and audit
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! default_doc_type = "contract"
//! max_input_chars = 200000
//!
//! [anonymization.rules]
//! directory = "${LEGALSCAN_RULES_HOME}/rules"
//! builtin = true
//!
//! [anonymization.tagger]
//! enabled = true
//! gazetteer = "./rules/gazetteer.toml"
//!
//! [anonymization.audit]
//! enabled = true
//! log_path = "./audit/anonymization.log"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::{AnonymizationConfig, AuditConfig, RulesConfig, TaggerConfig};
pub use loader::{load_config, load_config_str};
pub use schema::{ApplicationConfig, LegalScanConfig, LoggingConfig};
