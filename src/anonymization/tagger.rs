//! Statistical tagger capability
//!
//! The core never owns a model. A tagger is constructed once at start-up
//! and injected into the pipeline as `Arc<dyn EntityTagger>`. Backends that
//! need `&mut self` implement [`NerModel`] and are wrapped in
//! [`SerializedTagger`], which locks around every call.

use crate::anonymization::models::{CandidateSource, EntityKind, RawCandidate, Span};
use crate::domain::TaggerError;
use crate::rules::{normalize_whitespace, RuleSet};
use std::sync::Mutex;

/// One span reported by a tagger, with the tagger's own label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub label: String,
    pub text: String,
    pub span: Span,
}

impl TaggedSpan {
    pub fn new(label: impl Into<String>, text: impl Into<String>, span: Span) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            span,
        }
    }
}

/// Thread-safe tagger interface
pub trait EntityTagger: Send + Sync {
    /// Backend identifier for logs
    fn name(&self) -> &str;

    /// Tag `text`, returning spans in the tagger's native labels
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError>;
}

/// Tagger backend that is not safe to call concurrently
pub trait NerModel: Send {
    fn name(&self) -> &str;

    fn predict(&mut self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError>;
}

/// Serializes access to a [`NerModel`] behind a mutex
pub struct SerializedTagger<M: NerModel> {
    name: String,
    model: Mutex<M>,
}

impl<M: NerModel> SerializedTagger<M> {
    pub fn new(model: M) -> Self {
        Self {
            name: model.name().to_string(),
            model: Mutex::new(model),
        }
    }
}

impl<M: NerModel> EntityTagger for SerializedTagger<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| TaggerError::Unavailable(format!("{} model lock poisoned", self.name)))?;
        model.predict(text)
    }
}

/// Run `tagger` over `text` and convert its output into candidates
///
/// Native labels go through [`EntityKind::from_tagger_label`]; unmapped
/// labels are dropped. The rule set's min-length, stoplist and per-kind
/// fallback switches apply as for rule-based candidates.
///
/// # Errors
///
/// Returns the tagger's own error, or [`TaggerError::Failed`] when it
/// reports a span that does not lie on character boundaries of `text`.
pub fn statistical_candidates(
    tagger: &dyn EntityTagger,
    text: &str,
    rules: &RuleSet,
) -> Result<Vec<RawCandidate>, TaggerError> {
    let tagged = tagger.tag(text)?;
    let total = tagged.len();

    if let Some(bad) = tagged
        .iter()
        .find(|t| t.span.start > t.span.end || text.get(t.span.start..t.span.end).is_none())
    {
        return Err(TaggerError::Failed(format!(
            "{} reported span {}..{} outside the text",
            tagger.name(),
            bad.span.start,
            bad.span.end
        )));
    }

    let candidates: Vec<RawCandidate> = tagged
        .into_iter()
        .filter_map(|span| {
            let kind = EntityKind::from_tagger_label(&span.label)?;
            if !rules.fallback_enabled_for(kind) {
                return None;
            }
            let candidate_text = normalize_whitespace(&span.text);
            if candidate_text.is_empty()
                || candidate_text.chars().count() < rules.min_length_for(kind)
                || rules.is_stoplisted(kind, &candidate_text)
            {
                return None;
            }
            Some(RawCandidate::new(
                kind,
                candidate_text,
                span.span,
                CandidateSource::Statistical,
            ))
        })
        .collect();

    tracing::debug!(
        tagger = tagger.name(),
        tagged = total,
        kept = candidates.len(),
        "Statistical tagging complete"
    );
    Ok(candidates)
}
