//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for LegalScan using clap.

pub mod commands;

use crate::config::{load_config, load_config_str, LegalScanConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// LegalScan - personal data redaction for legal documents
#[derive(Parser, Debug)]
#[command(name = "legalscan")]
#[command(version, about, long_about = None)]
#[command(author = "LegalScan Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "legalscan.toml", env = "LEGALSCAN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEGALSCAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and redact personal data in a document
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Load and compile the configured rule sets
    ValidateRules(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Load the configuration file, or defaults when it does not exist
///
/// Defaults still go through environment overrides and validation.
pub fn load_or_default(path: &str) -> Result<LegalScanConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        tracing::debug!(config_path = %path, "Configuration file not found, using defaults");
        load_config_str("")
    }
}
