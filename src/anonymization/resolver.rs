//! Candidate deduplication and labeling
//!
//! Candidates from every source are ranked longest-first, with rule-based
//! candidates ahead of statistical ones at equal length and discovery order
//! as the final tie-break. Walking that ranking:
//!
//! - a candidate whose case-insensitive, single-spaced text was already seen
//!   for its kind is a duplicate;
//! - a candidate whose span lies inside the span of a same-kind candidate
//!   already seen is shadowed by it;
//! - anything else is accepted and labeled `KIND`, `KIND_2`, `KIND_3`, ...
//!   in acceptance order.
//!
//! Candidates of different kinds are never merged, even with identical text.

use crate::anonymization::models::{EntityKind, RawCandidate, ResolvedEntity, Span};
use crate::rules::normalize_whitespace;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct EntityResolver;

impl EntityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve candidates into labeled entities, longest text first
    pub fn resolve(&self, candidates: Vec<RawCandidate>) -> Vec<ResolvedEntity> {
        let total = candidates.len();
        let mut ranked: Vec<(usize, RawCandidate)> = candidates.into_iter().enumerate().collect();
        ranked.sort_by(|(ia, a), (ib, b)| {
            b.char_len()
                .cmp(&a.char_len())
                .then(a.source.cmp(&b.source))
                .then(ia.cmp(ib))
        });

        let mut seen: HashMap<(EntityKind, String), usize> = HashMap::new();
        let mut covered: HashMap<EntityKind, Vec<Span>> = HashMap::new();
        let mut counts: HashMap<EntityKind, usize> = HashMap::new();
        let mut entities: Vec<ResolvedEntity> = Vec::new();

        for (_, candidate) in ranked {
            if candidate.text.is_empty() {
                continue;
            }
            let key = (candidate.kind, dedup_key(&candidate.text));
            let kind_covered = covered.entry(candidate.kind).or_default();

            if let Some(&index) = seen.get(&key) {
                kind_covered.push(candidate.span);
                entities[index].spans.push(candidate.span);
                continue;
            }
            if kind_covered.iter().any(|s| s.contains(&candidate.span)) {
                continue;
            }

            seen.insert(key, entities.len());
            kind_covered.push(candidate.span);

            let count = counts.entry(candidate.kind).or_insert(0);
            *count += 1;
            let mut entity =
                ResolvedEntity::new(candidate.kind, label_for(candidate.kind, *count), candidate.text);
            entity.spans.push(candidate.span);
            entities.push(entity);
        }

        tracing::debug!(candidates = total, entities = entities.len(), "Candidates resolved");
        entities
    }
}

/// `KIND` for the first entity of a kind, `KIND_n` for the nth after that
pub fn label_for(kind: EntityKind, n: usize) -> String {
    if n <= 1 {
        kind.label().to_string()
    } else {
        format!("{}_{}", kind.label(), n)
    }
}

fn dedup_key(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}
