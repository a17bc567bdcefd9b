//! Rule-based pattern extraction

use crate::anonymization::models::{CandidateSource, RawCandidate};
use crate::rules::RuleSet;

/// Applies a rule set's patterns to raw text
///
/// Candidates come out in discovery order: rule declaration order, then
/// pattern order, then match position.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract candidates from `text`
    ///
    /// Never fails: a pattern that errors while matching contributes the
    /// matches found before the error and extraction moves on.
    pub fn extract(&self, text: &str, rules: &RuleSet) -> Vec<RawCandidate> {
        let mut candidates = Vec::new();

        for rule in rules.rules() {
            let kind = rule.kind();
            for pattern in rule.patterns() {
                let scan = pattern.scan(kind, text);
                if let Some(err) = scan.error {
                    tracing::warn!(
                        doc_type = rules.doc_type(),
                        error = %err,
                        kept = scan.matches.len(),
                        "Pattern failed during matching"
                    );
                }

                for m in &scan.matches {
                    let candidate_text = pattern.candidate_text(m);
                    if candidate_text.is_empty()
                        || candidate_text.chars().count() < rule.min_length()
                    {
                        continue;
                    }
                    if rule.is_stoplisted(&candidate_text) {
                        tracing::trace!(kind = %kind, "Stoplisted candidate dropped");
                        continue;
                    }
                    candidates.push(RawCandidate::new(
                        kind,
                        candidate_text,
                        m.span,
                        CandidateSource::RuleBased,
                    ));
                }
            }
        }

        tracing::debug!(
            doc_type = rules.doc_type(),
            candidates = candidates.len(),
            "Pattern extraction complete"
        );
        candidates
    }
}
