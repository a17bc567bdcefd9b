//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "legalscan.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            eprintln!("Configuration file already exists: {}", self.output);
            eprintln!("Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Check rule sets: legalscan validate-rules");
                println!("  3. Redact a document: legalscan anonymize --doc-type contract --input doc.txt");
                Ok(0)
            }
            Err(e) => {
                eprintln!("Failed to write configuration file: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    pub fn generate_minimal_config() -> String {
        r#"# LegalScan Configuration File

[application]
log_level = "info"

[anonymization]
default_doc_type = "general"
max_input_chars = 200000

[anonymization.rules]
builtin = true

[anonymization.tagger]
enabled = false

[anonymization.audit]
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    pub fn generate_config_with_examples() -> String {
        r#"# LegalScan Configuration File
#
# Every setting below can also be overridden through LEGALSCAN_* environment
# variables, and values may reference ${VAR} placeholders.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Doc type used when --doc-type is not given
default_doc_type = "general"

# Inputs longer than this many characters are rejected before processing
max_input_chars = 200000

[anonymization.rules]
# Directory of <doc_type>.toml rule files, consulted before the built-in library
# directory = "./rules"

# Fall back to the built-in rule library (doc types: general, contract)
builtin = true

[anonymization.tagger]
# Add statistical candidates from a gazetteer
enabled = false
# gazetteer = "./rules/gazetteer.toml"

[anonymization.audit]
# Append one line per run; entity values are stored as SHA-256 hashes only
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output on stderr
local_enabled = false
local_path = "./logs"

# Rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
