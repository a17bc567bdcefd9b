//! Validate rules command implementation
//!
//! This module implements the `validate-rules` command, which loads and
//! compiles the configured rule sets and reports what they contain.

use crate::anonymization::Pipeline;
use crate::config::LegalScanConfig;
use crate::rules::RuleSet;
use clap::Args;

/// Arguments for the validate-rules command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Only validate this doc type
    #[arg(short, long)]
    pub doc_type: Option<String>,
}

impl ValidateArgs {
    /// Execute the validate-rules command
    pub async fn execute(&self, config: &LegalScanConfig) -> anyhow::Result<i32> {
        let pipeline = match Pipeline::from_config(&config.anonymization) {
            Ok(p) => p,
            Err(e) => {
                println!("Failed to load rules");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        let store = pipeline.rule_store();

        let doc_types = match self.doc_type {
            Some(ref doc_type) => vec![doc_type.clone()],
            None => store.doc_types(),
        };
        crate::log_rule_summary!("configured", &doc_types);

        if doc_types.is_empty() {
            println!("No rule sets configured");
            return Ok(2);
        }

        let mut failed = false;
        for doc_type in &doc_types {
            match store.load(doc_type) {
                Ok(Some(rules)) => println!("{}", describe(&rules)),
                Ok(None) => {
                    println!("{doc_type}: no rule set found");
                    failed = true;
                }
                Err(e) => {
                    println!("{doc_type}: invalid");
                    println!("   Error: {e}");
                    failed = true;
                }
            }
        }

        Ok(if failed { 2 } else { 0 })
    }
}

fn describe(rules: &RuleSet) -> String {
    let patterns: usize = rules.rules().iter().map(|r| r.patterns().len()).sum();
    let mut line = format!(
        "{}: {} rules, {} patterns, fallback {}",
        rules.doc_type(),
        rules.rules().len(),
        patterns,
        if rules.fallback_enabled() { "on" } else { "off" }
    );
    let skipped = rules.skipped_patterns();
    if skipped > 0 {
        line.push_str(&format!(", {skipped} skipped (see warnings)"));
    }
    line
}
