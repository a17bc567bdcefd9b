//! Anonymize command implementation
//!
//! Reads a document from a file or stdin, runs the pipeline and prints the
//! result.

use crate::anonymization::{AnonymizationResult, Pipeline};
use crate::config::LegalScanConfig;
use crate::domain::LegalScanError;
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full result as JSON
    Json,
    /// Entity summary followed by the redacted text
    Text,
}

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Document type selecting the rule set (defaults to anonymization.default_doc_type)
    #[arg(short, long)]
    pub doc_type: Option<String>,

    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config: &LegalScanConfig) -> anyhow::Result<i32> {
        let doc_type = self
            .doc_type
            .clone()
            .unwrap_or_else(|| config.anonymization.default_doc_type.clone());

        let pipeline = match Pipeline::from_config(&config.anonymization) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to build pipeline");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let text = self.read_input().await?;
        tracing::info!(doc_type = %doc_type, chars = text.chars().count(), "Anonymizing document");

        let run = {
            let pipeline = Arc::clone(&pipeline);
            let doc_type = doc_type.clone();
            tokio::task::spawn_blocking(move || pipeline.run(&text, &doc_type))
                .await
                .context("Anonymization task panicked")?
        };

        match run {
            Ok(result) => {
                println!("{}", self.render(&result)?);
                Ok(0)
            }
            Err(e @ LegalScanError::InputTooLarge { .. }) => {
                eprintln!("{e}");
                Ok(3)
            }
            Err(e @ LegalScanError::RuleSchema { .. }) => {
                crate::log_error_with_context!(&e, "Rule set rejected");
                eprintln!("{e}");
                Ok(2)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read_input(&self) -> anyhow::Result<String> {
        match self.input {
            Some(ref path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read input file {path}")),
            None => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("Failed to read stdin")?;
                Ok(text)
            }
        }
    }

    fn render(&self, result: &AnonymizationResult) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(result).context("Failed to serialize result")
            }
            OutputFormat::Text => Ok(render_text(result)),
        }
    }
}

fn render_text(result: &AnonymizationResult) -> String {
    if !result.has_entities() {
        return result.redacted_text.clone();
    }

    let stats = result
        .stats_by_kind()
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Entities ({stats}):\n{}\n\n{}",
        result.entity_summary(),
        result.redacted_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::{EntityKind, ResolvedEntity};
    use tempfile::tempdir;

    fn args(input: Option<String>, format: OutputFormat) -> AnonymizeArgs {
        AnonymizeArgs {
            doc_type: Some("general".to_string()),
            input,
            format,
        }
    }

    #[test]
    fn test_render_text_with_entities() {
        let result = AnonymizationResult {
            doc_type: "general".to_string(),
            redacted_text: "[[PERSON]] оплатил [[MONEY]]".to_string(),
            entities: vec![
                ResolvedEntity::new(EntityKind::Person, "PERSON", "Иванов Иван Иванович"),
                ResolvedEntity::new(EntityKind::Money, "MONEY", "500 рублей"),
            ],
        };

        assert_eq!(
            render_text(&result),
            "Entities (PERSON: 1, MONEY: 1):\n[PERSON] Иванов Иван Иванович\n[MONEY] 500 рублей\n\n[[PERSON]] оплатил [[MONEY]]"
        );
    }

    #[test]
    fn test_render_text_without_entities() {
        let result = AnonymizationResult {
            doc_type: "general".to_string(),
            redacted_text: "ничего".to_string(),
            entities: Vec::new(),
        };
        assert_eq!(render_text(&result), "ничего");
    }

    #[tokio::test]
    async fn test_execute_from_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        std::fs::write(&input, "Иванов Иван Иванович подписал договор").unwrap();

        let code = args(Some(input.to_string_lossy().to_string()), OutputFormat::Text)
            .execute(&LegalScanConfig::default())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_execute_input_too_large() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        std::fs::write(&input, "Иванов Иван Иванович").unwrap();

        let mut config = LegalScanConfig::default();
        config.anonymization.max_input_chars = Some(5);
        let code = args(Some(input.to_string_lossy().to_string()), OutputFormat::Json)
            .execute(&config)
            .await
            .unwrap();
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn test_execute_missing_input_file() {
        let result = args(Some("/definitely/not/here.txt".to_string()), OutputFormat::Json)
            .execute(&LegalScanConfig::default())
            .await;
        assert!(result.is_err());
    }
}
