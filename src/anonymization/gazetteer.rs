//! Dictionary-backed tagger
//!
//! Loads lists of known names, places and organizations once and reports
//! whole-word, case-insensitive occurrences under tagger-style labels
//! (`PER`, `LOC`, `ORG`, ...). Used as the default statistical capability
//! when no model-backed tagger is wired in.
//!
//! # File Format
//!
//! ```toml
//! [labels]
//! PER = ["Сидоров Алексей Петрович"]
//! LOC = ["Москва", "Санкт-Петербург"]
//! ORG = ["Газпром"]
//! ```

use super::redactor::is_whole_word;
use super::tagger::{EntityTagger, TaggedSpan};
use crate::anonymization::models::Span;
use crate::domain::{LegalScanError, Result, TaggerError};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GazetteerFile {
    #[serde(default)]
    labels: BTreeMap<String, Vec<String>>,
}

/// Tagger that matches fixed term lists
#[derive(Debug)]
pub struct GazetteerTagger {
    name: String,
    matchers: Vec<(String, Regex)>,
}

impl GazetteerTagger {
    /// Load a gazetteer from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LegalScanError::Configuration(format!(
                "Failed to read gazetteer {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut tagger = Self::from_toml(&content)?;
        tagger.name = format!("gazetteer:{}", path.display());
        Ok(tagger)
    }

    /// Build a gazetteer from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: GazetteerFile = toml::from_str(content)?;

        let mut matchers = Vec::with_capacity(file.labels.len());
        for (label, terms) in file.labels {
            let mut terms: Vec<String> = terms
                .iter()
                .map(|t| t.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
                .filter(|t| !t.is_empty())
                .collect();
            if terms.is_empty() {
                continue;
            }
            // Longest alternatives first so leftmost-first matching prefers them
            terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
            terms.dedup();

            let regex = RegexBuilder::new(&format!("(?:{})", terms.join("|")))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    LegalScanError::Configuration(format!(
                        "Gazetteer terms for {label} do not compile: {e}"
                    ))
                })?;
            matchers.push((label, regex));
        }

        Ok(Self {
            name: "gazetteer".to_string(),
            matchers,
        })
    }

    /// Number of labels with at least one term
    pub fn label_count(&self) -> usize {
        self.matchers.len()
    }
}

impl EntityTagger for GazetteerTagger {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self, text: &str) -> std::result::Result<Vec<TaggedSpan>, TaggerError> {
        let mut spans = Vec::new();

        for (label, regex) in &self.matchers {
            let mut pos = 0;
            while let Some(m) = regex.find_at(text, pos) {
                if is_whole_word(text, m.start(), m.end()) {
                    spans.push(TaggedSpan::new(
                        label.clone(),
                        m.as_str(),
                        Span::new(m.start(), m.end()),
                    ));
                    pos = m.end();
                } else {
                    pos = next_char_boundary(text, m.start());
                }
                if pos >= text.len() {
                    break;
                }
            }
        }

        spans.sort_by_key(|s| (s.span.start, std::cmp::Reverse(s.span.end)));
        Ok(spans)
    }
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map(|c| from + c.len_utf8())
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAZETTEER: &str = r#"
[labels]
PER = ["Сидоров Алексей"]
LOC = ["Москва", "Санкт-Петербург"]
ORG = []
"#;

    #[test]
    fn test_load_skips_empty_labels() {
        let tagger = GazetteerTagger::from_toml(GAZETTEER).unwrap();
        assert_eq!(tagger.label_count(), 2);
    }

    #[test]
    fn test_tags_whole_words_case_insensitively() {
        let tagger = GazetteerTagger::from_toml(GAZETTEER).unwrap();
        let spans = tagger
            .tag("Сидоров  Алексей переехал из МОСКВА в Санкт-Петербург, Москвастрой не при чём")
            .unwrap();

        let found: Vec<(&str, &str)> = spans
            .iter()
            .map(|s| (s.label.as_str(), s.text.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("PER", "Сидоров  Алексей"),
                ("LOC", "МОСКВА"),
                ("LOC", "Санкт-Петербург"),
            ]
        );
    }

    #[test]
    fn test_spans_point_into_text() {
        let tagger = GazetteerTagger::from_toml(GAZETTEER).unwrap();
        let text = "г. Москва";
        let spans = tagger.tag(text).unwrap();
        assert_eq!(&text[spans[0].span.start..spans[0].span.end], "Москва");
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let err = GazetteerTagger::from_toml("labels = 3").unwrap_err();
        assert!(matches!(err, LegalScanError::Configuration(_)));
    }
}
