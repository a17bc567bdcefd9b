//! Configuration schema types
//!
//! This module defines the configuration structure for LegalScan.

use crate::anonymization::config::AnonymizationConfig;
use serde::{Deserialize, Serialize};

/// Main LegalScan configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; an empty file yields a working configuration
/// backed by the built-in rule library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegalScanConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Extraction and redaction settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LegalScanConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.anonymization.validate().map_err(|e| e.to_string())?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_empty_document_is_valid() {
        let config: LegalScanConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert!(!config.logging.local_enabled);
        assert!(config.anonymization.rules.builtin);
        assert!(config.validate().is_ok());
    }

    #[test_case("trace" ; "trace")]
    #[test_case("debug" ; "debug")]
    #[test_case("warn" ; "warn")]
    fn test_valid_log_levels(level: &str) {
        let mut config = LegalScanConfig::default();
        config.application.log_level = level.to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = LegalScanConfig::default();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level 'verbose'"));
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = LegalScanConfig::default();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nested_anonymization_sections() {
        let config: LegalScanConfig = toml::from_str(
            r#"
[anonymization]
default_doc_type = "contract"
max_input_chars = 1000

[anonymization.rules]
builtin = false

[anonymization.audit]
enabled = true
log_path = "./audit/runs.log"
json_format = false
"#,
        )
        .unwrap();

        assert_eq!(config.anonymization.default_doc_type, "contract");
        assert_eq!(config.anonymization.max_input_chars, Some(1000));
        assert!(!config.anonymization.rules.builtin);
        assert!(config.anonymization.audit.enabled);
        assert!(!config.anonymization.audit.json_format);
    }

    #[test]
    fn test_invalid_anonymization_section_fails_validation() {
        let mut config = LegalScanConfig::default();
        config.anonymization.tagger.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.contains("tagger.gazetteer"));
    }
}
