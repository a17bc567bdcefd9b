//! Anonymization pipeline
//!
//! [`Pipeline`] wires the stages together for one call:
//!
//! 1. load the rule set for the doc type (an unknown doc type gets an empty set)
//! 2. collect rule-based candidates and, when enabled, statistical ones
//! 3. resolve candidates into labeled entities
//! 4. substitute placeholders into the text
//!
//! Only a malformed rule file or an oversized input fails a run. Missing
//! rules, failing patterns and an unavailable tagger all degrade to fewer
//! entities found.
//!
//! # Examples
//!
//! ```
//! use legalscan::anonymization::Pipeline;
//! use legalscan::rules::{builtin_store, RuleStore};
//! use std::sync::Arc;
//!
//! # fn example() -> legalscan::domain::Result<()> {
//! let store: Arc<dyn RuleStore> = Arc::new(builtin_store()?);
//! let pipeline = Pipeline::builder(store).build();
//!
//! let result = pipeline.run("Иванов Иван Иванович подписал договор", "general")?;
//! assert_eq!(result.redacted_text, "[[PERSON]] подписал договор");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::AnonymizationConfig,
    extractor::PatternExtractor,
    gazetteer::GazetteerTagger,
    models::AnonymizationResult,
    redactor::Redactor,
    resolver::EntityResolver,
    tagger::{statistical_candidates, EntityTagger},
};
use crate::domain::{LegalScanError, Result};
use crate::rules::{builtin_store, ChainedRuleStore, DirectoryRuleStore, RuleSet, RuleStore};
use std::sync::Arc;
use std::time::Instant;

/// Doc type used when the caller passes an empty one
pub const UNKNOWN_DOC_TYPE: &str = "unknown";

/// Entity extraction and redaction over plain text
///
/// The pipeline holds no per-call state and is shared across tasks by
/// reference or `Arc`. The rule store and tagger are the only shared
/// resources; both are safe for concurrent use.
pub struct Pipeline {
    rule_store: Arc<dyn RuleStore>,
    tagger: Option<Arc<dyn EntityTagger>>,
    max_input_chars: Option<usize>,
    audit_logger: Option<AuditLogger>,
    extractor: PatternExtractor,
    resolver: EntityResolver,
    redactor: Redactor,
}

/// Builder for [`Pipeline`]
pub struct PipelineBuilder {
    rule_store: Arc<dyn RuleStore>,
    tagger: Option<Arc<dyn EntityTagger>>,
    max_input_chars: Option<usize>,
    audit_logger: Option<AuditLogger>,
}

impl PipelineBuilder {
    /// Use `tagger` for statistical candidates
    pub fn tagger(mut self, tagger: Arc<dyn EntityTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Reject inputs longer than `limit` characters
    pub fn max_input_chars(mut self, limit: usize) -> Self {
        self.max_input_chars = Some(limit);
        self
    }

    /// Record every run in `logger`
    pub fn audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            rule_store: self.rule_store,
            tagger: self.tagger,
            max_input_chars: self.max_input_chars,
            audit_logger: self.audit_logger,
            extractor: PatternExtractor::new(),
            resolver: EntityResolver::new(),
            redactor: Redactor::new(),
        }
    }
}

impl Pipeline {
    pub fn builder(rule_store: Arc<dyn RuleStore>) -> PipelineBuilder {
        PipelineBuilder {
            rule_store,
            tagger: None,
            max_input_chars: None,
            audit_logger: None,
        }
    }

    /// Build a pipeline from configuration
    ///
    /// The rules directory, when set, is consulted before the built-in
    /// library. A gazetteer that fails to load is reported and the pipeline
    /// runs rule-based only.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the built-in library
    /// does not compile, or the audit log cannot be created.
    pub fn from_config(config: &AnonymizationConfig) -> Result<Self> {
        config.validate()?;

        let mut stores: Vec<Arc<dyn RuleStore>> = Vec::new();
        if let Some(ref dir) = config.rules.directory {
            stores.push(Arc::new(DirectoryRuleStore::new(dir)));
        }
        if config.rules.builtin {
            stores.push(Arc::new(builtin_store()?));
        }
        let mut builder = Self::builder(Arc::new(ChainedRuleStore::new(stores)));

        if config.tagger.enabled {
            if let Some(ref path) = config.tagger.gazetteer {
                match GazetteerTagger::from_file(path) {
                    Ok(tagger) => {
                        tracing::info!(
                            tagger = tagger.name(),
                            labels = tagger.label_count(),
                            "Statistical tagger loaded"
                        );
                        builder = builder.tagger(Arc::new(tagger));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Tagger unavailable, running rule-based only");
                    }
                }
            }
        }

        if let Some(limit) = config.max_input_chars {
            builder = builder.max_input_chars(limit);
        }

        if config.audit.enabled {
            builder = builder.audit_logger(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?);
        }

        Ok(builder.build())
    }

    pub fn rule_store(&self) -> &Arc<dyn RuleStore> {
        &self.rule_store
    }

    pub fn has_tagger(&self) -> bool {
        self.tagger.is_some()
    }

    /// Extract entities from `text` and redact them
    ///
    /// # Errors
    ///
    /// - [`LegalScanError::InputTooLarge`] when `text` exceeds the configured limit
    /// - [`LegalScanError::RuleSchema`] when the doc type's rule file is malformed
    pub fn run(&self, text: &str, doc_type: &str) -> Result<AnonymizationResult> {
        let start = Instant::now();

        if let Some(limit) = self.max_input_chars {
            let len = text.chars().count();
            if len > limit {
                return Err(LegalScanError::InputTooLarge { len, limit });
            }
        }

        let doc_type = if doc_type.trim().is_empty() {
            UNKNOWN_DOC_TYPE
        } else {
            doc_type
        };

        let rules = self.load_rules(doc_type)?;

        let mut candidates = self.extractor.extract(text, &rules);
        let rule_based = candidates.len();

        if rules.fallback_enabled() {
            if let Some(ref tagger) = self.tagger {
                match statistical_candidates(tagger.as_ref(), text, &rules) {
                    Ok(found) => candidates.extend(found),
                    Err(e) => {
                        tracing::warn!(
                            doc_type,
                            tagger = tagger.name(),
                            error = %e,
                            "Statistical tagging failed, using rule-based candidates only"
                        );
                    }
                }
            }
        }
        let statistical = candidates.len() - rule_based;

        let entities = self.resolver.resolve(candidates);
        let outcome = self.redactor.redact_document(text, &entities);

        let result = AnonymizationResult {
            doc_type: doc_type.to_string(),
            redacted_text: outcome.text,
            entities,
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            doc_type,
            rule_based,
            statistical,
            entities = result.entities.len(),
            substitutions = outcome.substitutions.values().sum::<usize>(),
            processing_time_ms,
            "Anonymization run complete"
        );

        if let Some(ref audit) = self.audit_logger {
            if let Err(e) = audit.log_run(&result, processing_time_ms) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        Ok(result)
    }

    fn load_rules(&self, doc_type: &str) -> Result<Arc<RuleSet>> {
        match self.rule_store.load(doc_type) {
            Ok(Some(rules)) => Ok(rules),
            Ok(None) => {
                tracing::debug!(doc_type, "No rules configured for doc type");
                Ok(Arc::new(RuleSet::empty(doc_type)))
            }
            Err(e @ LegalScanError::RuleSchema { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(doc_type, error = %e, "Rule set unavailable, continuing without rules");
                Ok(Arc::new(RuleSet::empty(doc_type)))
            }
        }
    }
}
