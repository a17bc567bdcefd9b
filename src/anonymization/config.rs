//! Anonymization configuration

use crate::domain::{LegalScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anonymization pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Doc type used when the caller does not supply one
    #[serde(default = "default_doc_type")]
    pub default_doc_type: String,

    /// Inputs longer than this many characters are rejected
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: Option<usize>,

    /// Rule sources
    #[serde(default)]
    pub rules: RulesConfig,

    /// Statistical tagger
    #[serde(default)]
    pub tagger: TaggerConfig,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_doc_type() -> String {
    "unknown".to_string()
}

fn default_max_input_chars() -> Option<usize> {
    Some(200_000)
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            default_doc_type: default_doc_type(),
            max_input_chars: default_max_input_chars(),
            rules: RulesConfig::default(),
            tagger: TaggerConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_doc_type.trim().is_empty() {
            return Err(LegalScanError::Configuration(
                "default_doc_type cannot be empty".to_string(),
            ));
        }
        if self.max_input_chars == Some(0) {
            return Err(LegalScanError::Configuration(
                "max_input_chars must be greater than 0".to_string(),
            ));
        }

        self.rules.validate()?;
        self.tagger.validate()?;
        self.audit.validate()?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("LEGALSCAN_ANONYMIZATION_DEFAULT_DOC_TYPE") {
            self.default_doc_type = val;
        }

        if let Ok(val) = std::env::var("LEGALSCAN_ANONYMIZATION_MAX_INPUT_CHARS") {
            self.max_input_chars = Some(parse_env("LEGALSCAN_ANONYMIZATION_MAX_INPUT_CHARS", &val)?);
        }

        if let Ok(val) = std::env::var("LEGALSCAN_RULES_DIRECTORY") {
            self.rules.directory = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("LEGALSCAN_RULES_BUILTIN") {
            self.rules.builtin = parse_env("LEGALSCAN_RULES_BUILTIN", &val)?;
        }

        if let Ok(val) = std::env::var("LEGALSCAN_TAGGER_ENABLED") {
            self.tagger.enabled = parse_env("LEGALSCAN_TAGGER_ENABLED", &val)?;
        }

        if let Ok(val) = std::env::var("LEGALSCAN_TAGGER_GAZETTEER") {
            self.tagger.gazetteer = Some(PathBuf::from(val));
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Where rule sets come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Directory of `<doc_type>.toml` files, consulted first
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Fall back to the built-in rule library
    #[serde(default = "default_true")]
    pub builtin: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            builtin: true,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref dir) = self.directory {
            if !dir.is_dir() {
                return Err(LegalScanError::Configuration(format!(
                    "Rules directory not found: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Statistical tagger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Load a tagger at start-up
    #[serde(default)]
    pub enabled: bool,

    /// Gazetteer TOML used as the tagger
    #[serde(default)]
    pub gazetteer: Option<PathBuf>,
}

impl TaggerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.gazetteer.is_none() {
            return Err(LegalScanError::Configuration(
                "tagger.gazetteer is required when tagger.enabled = true".to_string(),
            ));
        }
        if let Some(ref path) = self.gazetteer {
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(LegalScanError::Configuration(format!(
                    "Gazetteer must be a TOML file: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

fn default_true() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_true(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err(LegalScanError::Configuration(
                "audit.log_path cannot be empty when audit is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("LEGALSCAN_AUDIT_ENABLED") {
            self.enabled = parse_env("LEGALSCAN_AUDIT_ENABLED", &val)?;
        }

        if let Ok(val) = std::env::var("LEGALSCAN_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LEGALSCAN_AUDIT_JSON_FORMAT") {
            self.json_format = parse_env("LEGALSCAN_AUDIT_JSON_FORMAT", &val)?;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| LegalScanError::Configuration(format!("Invalid {name} value: {val}")))
}
