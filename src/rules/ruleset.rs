//! Compiled, immutable rule sets

use super::pattern::CompiledPattern;
use super::schema::{RuleDefinition, RuleSetDefinition, DEFAULT_MIN_LENGTH};
use crate::anonymization::models::EntityKind;
use crate::domain::{LegalScanError, Result};
use std::collections::HashSet;

/// Extraction rule for one entity kind
#[derive(Debug, Clone)]
pub struct Rule {
    kind: EntityKind,
    patterns: Vec<CompiledPattern>,
    min_length: usize,
    stoplist: HashSet<String>,
    enable_fallback: Option<bool>,
    skipped_patterns: usize,
}

impl Rule {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Patterns dropped at load time because no engine could compile them
    pub fn skipped_patterns(&self) -> usize {
        self.skipped_patterns
    }

    /// Whether a candidate of this rule's kind is excluded by the stoplist
    ///
    /// Only PERSON candidates are subject to stoplists.
    pub fn is_stoplisted(&self, text: &str) -> bool {
        self.kind == EntityKind::Person && self.stoplist.contains(&text.to_lowercase())
    }
}

/// All rules governing one doc type, in declaration order
#[derive(Debug, Clone)]
pub struct RuleSet {
    doc_type: String,
    rules: Vec<Rule>,
    min_length: usize,
    stoplist: HashSet<String>,
    enable_fallback: bool,
}

impl RuleSet {
    /// Rule set used when a doc type has no configuration
    pub fn empty(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            rules: Vec::new(),
            min_length: DEFAULT_MIN_LENGTH,
            stoplist: HashSet::new(),
            enable_fallback: true,
        }
    }

    /// Parse and compile a single doc type's rule file
    pub fn from_toml(doc_type: &str, content: &str) -> Result<Self> {
        let definition: RuleSetDefinition = toml::from_str(content).map_err(|e| {
            LegalScanError::rule_schema(doc_type, "<file>", format!("TOML parse error: {e}"))
        })?;
        Self::compile(doc_type, definition)
    }

    /// Validate a definition and compile its patterns
    ///
    /// # Errors
    ///
    /// Returns [`LegalScanError::RuleSchema`] when a rule lacks a kind,
    /// names an unknown kind, or has no patterns. Patterns that fail to
    /// compile are skipped with a warning.
    pub fn compile(doc_type: &str, definition: RuleSetDefinition) -> Result<Self> {
        let min_length = definition.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
        let stoplist: HashSet<String> = definition
            .stoplist
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let rules = definition
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| compile_rule(doc_type, index, rule, min_length, &stoplist))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            doc_type,
            rules = rules.len(),
            patterns = rules.iter().map(|r| r.patterns.len()).sum::<usize>(),
            "Rule set compiled"
        );

        Ok(Self {
            doc_type: doc_type.to_string(),
            rules,
            min_length,
            stoplist,
            enable_fallback: definition.enable_fallback.unwrap_or(true),
        })
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the statistical tagger should run for this doc type
    pub fn fallback_enabled(&self) -> bool {
        self.enable_fallback
    }

    /// Whether tagger candidates of `kind` are admitted
    ///
    /// A rule for the kind may opt out; otherwise the set-level flag applies.
    pub fn fallback_enabled_for(&self, kind: EntityKind) -> bool {
        self.rules
            .iter()
            .find(|r| r.kind == kind)
            .and_then(|r| r.enable_fallback)
            .unwrap_or(self.enable_fallback)
    }

    /// Minimum length applied to tagger candidates of `kind`
    pub fn min_length_for(&self, kind: EntityKind) -> usize {
        self.rules
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.min_length)
            .unwrap_or(self.min_length)
    }

    /// Stoplist check for tagger candidates: the set-level list plus every
    /// PERSON rule's list
    pub fn is_stoplisted(&self, kind: EntityKind, text: &str) -> bool {
        if kind != EntityKind::Person {
            return false;
        }
        let lowered = text.to_lowercase();
        self.stoplist.contains(&lowered)
            || self
                .rules
                .iter()
                .any(|r| r.kind == EntityKind::Person && r.stoplist.contains(&lowered))
    }

    /// Total patterns skipped across all rules
    pub fn skipped_patterns(&self) -> usize {
        self.rules.iter().map(|r| r.skipped_patterns).sum()
    }
}

fn compile_rule(
    doc_type: &str,
    index: usize,
    definition: RuleDefinition,
    default_min_length: usize,
    shared_stoplist: &HashSet<String>,
) -> Result<Rule> {
    let entry = format!("rules[{index}]");

    let kind_name = definition
        .kind
        .as_deref()
        .ok_or_else(|| LegalScanError::rule_schema(doc_type, &entry, "missing required field 'kind'"))?;
    let kind: EntityKind = kind_name
        .parse()
        .map_err(|e: String| LegalScanError::rule_schema(doc_type, &entry, e))?;

    let entry = format!("{entry} ({kind})");
    let pattern_defs = definition
        .patterns
        .ok_or_else(|| LegalScanError::rule_schema(doc_type, &entry, "missing required field 'patterns'"))?;
    if pattern_defs.is_empty() {
        return Err(LegalScanError::rule_schema(
            doc_type,
            &entry,
            "'patterns' must not be empty",
        ));
    }

    let mut patterns = Vec::with_capacity(pattern_defs.len());
    let mut skipped_patterns = 0;
    for def in &pattern_defs {
        if def.regex().trim().is_empty() {
            return Err(LegalScanError::rule_schema(
                doc_type,
                &entry,
                "pattern must not be empty",
            ));
        }
        match CompiledPattern::compile(kind, def.regex(), def.template(), definition.case_sensitive)
        {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => {
                tracing::warn!(doc_type, entry = %entry, error = %e, "Skipping invalid pattern");
                skipped_patterns += 1;
            }
        }
    }

    let mut stoplist = shared_stoplist.clone();
    stoplist.extend(definition.stoplist.iter().map(|s| s.trim().to_lowercase()));

    Ok(Rule {
        kind,
        patterns,
        min_length: definition.min_length.unwrap_or(default_min_length),
        stoplist,
        enable_fallback: definition.enable_fallback,
        skipped_patterns,
    })
}
