//! Rule file schema
//!
//! Raw TOML shapes, deserialized as-is and checked when compiled into a
//! [`RuleSet`](super::RuleSet). Required fields are `Option`s here so a
//! missing field is reported with its doc type and rule entry instead of
//! as an anonymous TOML error.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Default minimum entity length in characters
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// One doc type's rules, as written in a rule file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDefinition {
    /// Default minimum length for every rule and for tagger candidates
    #[serde(default)]
    pub min_length: Option<usize>,

    /// Whether the statistical tagger runs for this doc type
    #[serde(default)]
    pub enable_fallback: Option<bool>,

    /// PERSON stoplist shared by every rule and by tagger candidates
    #[serde(default)]
    pub stoplist: Vec<String>,

    /// Rules in declaration order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A single entity-kind rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub kind: Option<String>,

    pub patterns: Option<Vec<PatternDefinition>>,

    #[serde(default)]
    pub min_length: Option<usize>,

    #[serde(default)]
    pub stoplist: Vec<String>,

    /// Patterns match case-insensitively unless set
    #[serde(default)]
    pub case_sensitive: bool,

    /// `false` drops tagger candidates of this kind
    #[serde(default)]
    pub enable_fallback: Option<bool>,
}

/// A pattern is either a bare regex or a regex with an output template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternDefinition {
    Plain(String),
    Templated {
        regex: String,
        #[serde(default)]
        template: Option<String>,
    },
}

impl PatternDefinition {
    pub fn regex(&self) -> &str {
        match self {
            Self::Plain(regex) => regex,
            Self::Templated { regex, .. } => regex,
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Templated { template, .. } => template.as_deref(),
        }
    }
}

/// Several doc types in one file, keyed by doc type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleLibraryDefinition {
    #[serde(default)]
    pub doc_types: BTreeMap<String, RuleSetDefinition>,
}
