//! Compiled rule patterns
//!
//! Patterns compile with the linear-time `regex` engine. Patterns using
//! features it lacks (look-around, backreferences) fall back to
//! `fancy-regex`, which can fail at match time when its backtrack limit is
//! hit.

use crate::anonymization::models::{EntityKind, Span};
use crate::domain::ExtractionError;
use regex::RegexBuilder;
use std::sync::LazyLock;

static TEMPLATE_SLOT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\{(\d+)\}").expect("valid template slot regex"));

#[derive(Debug, Clone)]
enum Engine {
    Standard(regex::Regex),
    Backtracking(fancy_regex::Regex),
}

/// One match of a pattern: the whole-match span plus its capture groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'t> {
    pub span: Span,
    pub whole: &'t str,
    /// Groups 1..n; `None` for groups that did not participate
    pub groups: Vec<Option<&'t str>>,
}

/// Result of scanning a text with one pattern
///
/// `error` is set when matching stopped early; `matches` still holds
/// everything found before the failure.
#[derive(Debug, Default)]
pub struct PatternScan<'t> {
    pub matches: Vec<PatternMatch<'t>>,
    pub error: Option<ExtractionError>,
}

/// A rule pattern ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    template: Option<String>,
    engine: Engine,
}

impl CompiledPattern {
    /// Compile a pattern for `kind`
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidPattern`] if neither engine accepts it.
    pub fn compile(
        kind: EntityKind,
        source: &str,
        template: Option<&str>,
        case_sensitive: bool,
    ) -> Result<Self, ExtractionError> {
        let engine = match RegexBuilder::new(source)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(regex) => Engine::Standard(regex),
            Err(standard_err) => {
                let flagged = if case_sensitive {
                    source.to_string()
                } else {
                    format!("(?i){source}")
                };
                let regex = fancy_regex::Regex::new(&flagged).map_err(|fancy_err| {
                    ExtractionError::InvalidPattern {
                        kind: kind.to_string(),
                        pattern: source.to_string(),
                        reason: format!("{standard_err}; {fancy_err}"),
                    }
                })?;
                tracing::debug!(kind = %kind, pattern = source, "Pattern compiled with backtracking engine");
                Engine::Backtracking(regex)
            }
        };

        Ok(Self {
            source: source.to_string(),
            template: template.map(str::to_string),
            engine,
        })
    }

    /// The pattern as written in the rule file
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_backtracking(&self) -> bool {
        matches!(self.engine, Engine::Backtracking(_))
    }

    /// Find all non-empty matches in `text`
    pub fn scan<'t>(&self, kind: EntityKind, text: &'t str) -> PatternScan<'t> {
        let mut scan = PatternScan::default();

        match &self.engine {
            Engine::Standard(regex) => {
                for caps in regex.captures_iter(text) {
                    let Some(whole) = caps.get(0) else { continue };
                    if whole.as_str().is_empty() {
                        continue;
                    }
                    scan.matches.push(PatternMatch {
                        span: Span::new(whole.start(), whole.end()),
                        whole: whole.as_str(),
                        groups: (1..caps.len())
                            .map(|i| caps.get(i).map(|m| m.as_str()))
                            .collect(),
                    });
                }
            }
            Engine::Backtracking(regex) => {
                for caps in regex.captures_iter(text) {
                    let caps = match caps {
                        Ok(caps) => caps,
                        Err(e) => {
                            scan.error = Some(ExtractionError::PatternExecution {
                                kind: kind.to_string(),
                                pattern: self.source.clone(),
                                reason: e.to_string(),
                            });
                            break;
                        }
                    };
                    let Some(whole) = caps.get(0) else { continue };
                    if whole.as_str().is_empty() {
                        continue;
                    }
                    scan.matches.push(PatternMatch {
                        span: Span::new(whole.start(), whole.end()),
                        whole: whole.as_str(),
                        groups: (1..caps.len())
                            .map(|i| caps.get(i).map(|m| m.as_str()))
                            .collect(),
                    });
                }
            }
        }

        scan
    }

    /// Candidate text for a match, trimmed and single-spaced
    ///
    /// With a template, `{n}` expands to group n (`{0}` is the whole match).
    /// Without one, non-empty groups are joined by a space; a pattern
    /// without groups yields the whole match.
    pub fn candidate_text(&self, m: &PatternMatch<'_>) -> String {
        let raw = match &self.template {
            Some(template) => TEMPLATE_SLOT
                .replace_all(template, |caps: &regex::Captures<'_>| {
                    let index: usize = caps[1].parse().unwrap_or(usize::MAX);
                    if index == 0 {
                        m.whole.to_string()
                    } else {
                        m.groups
                            .get(index - 1)
                            .copied()
                            .flatten()
                            .unwrap_or_default()
                            .to_string()
                    }
                })
                .into_owned(),
            None if m.groups.is_empty() => m.whole.to_string(),
            None => m
                .groups
                .iter()
                .flatten()
                .map(|g| g.trim())
                .filter(|g| !g.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        normalize_whitespace(&raw)
    }
}

/// Trim and collapse every whitespace run to a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
