//! Placeholder substitution
//!
//! Substitution is a single pass over span intervals:
//!
//! 1. Placeholders already present in the input are marked occupied, so
//!    redacting redacted text is a no-op.
//! 2. Entities are visited longest text first (stable on resolver order).
//!    Every whole-word, case-insensitive occurrence of an entity that does
//!    not overlap an occupied interval is claimed for it.
//! 3. The claimed intervals are emitted in text order with `[[LABEL]]`
//!    replacing the original text.
//!
//! Whitespace inside an entity matches any whitespace run, so names broken
//! across lines are still found.
//!
//! When redacting the document the entities were resolved from,
//! [`Redactor::redact_document`] also claims each entity's source spans
//! before searching for its text. This covers templated entities whose
//! normalized text does not occur verbatim.

use crate::anonymization::models::{ResolvedEntity, Span};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[A-Z]+(?:_\d+)?\]\]").expect("valid placeholder regex"));

/// Redacted text plus how often each label was substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionOutcome {
    pub text: String,
    pub substitutions: BTreeMap<String, usize>,
}

impl RedactionOutcome {
    pub fn total_substitutions(&self) -> usize {
        self.substitutions.values().sum()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Redactor;

impl Redactor {
    pub fn new() -> Self {
        Self
    }

    /// Replace every occurrence of every entity with its placeholder
    pub fn redact(&self, text: &str, entities: &[ResolvedEntity]) -> String {
        self.redact_with_stats(text, entities).text
    }

    /// Like [`redact`](Self::redact), also reporting substitution counts
    pub fn redact_with_stats(&self, text: &str, entities: &[ResolvedEntity]) -> RedactionOutcome {
        substitute(text, entities, false)
    }

    /// Redact the text the entities were resolved from
    ///
    /// Each entity's recorded spans are claimed first, then its remaining
    /// occurrences are searched as in [`redact_with_stats`](Self::redact_with_stats).
    /// Spans are only meaningful for that exact text; use
    /// [`redact`](Self::redact) for any other text.
    pub fn redact_document(&self, text: &str, entities: &[ResolvedEntity]) -> RedactionOutcome {
        substitute(text, entities, true)
    }
}

fn substitute(text: &str, entities: &[ResolvedEntity], claim_spans: bool) -> RedactionOutcome {
    let mut occupied: Vec<Span> = PLACEHOLDER
        .find_iter(text)
        .map(|m| Span::new(m.start(), m.end()))
        .collect();

    let mut order: Vec<&ResolvedEntity> = entities.iter().collect();
    order.sort_by_key(|e| std::cmp::Reverse(e.text.chars().count()));

    let mut claimed: Vec<(Span, &ResolvedEntity)> = Vec::new();
    for entity in order {
        if claim_spans {
            for span in &entity.spans {
                let valid = !span_is_empty(span) && text.get(span.start..span.end).is_some();
                if valid && !occupied.iter().any(|o| o.overlaps(span)) {
                    occupied.push(*span);
                    claimed.push((*span, entity));
                }
            }
        }

        let Some(matcher) = occurrence_matcher(&entity.text) else {
            continue;
        };

        let mut pos = 0;
        while pos < text.len() {
            let Some(m) = matcher.find_at(text, pos) else {
                break;
            };
            let span = Span::new(m.start(), m.end());
            let free = !occupied.iter().any(|o| o.overlaps(&span));
            if free && !span_is_empty(&span) && is_whole_word(text, span.start, span.end) {
                occupied.push(span);
                claimed.push((span, entity));
                pos = span.end;
            } else {
                pos = next_char_boundary(text, span.start);
            }
        }
    }

    claimed.sort_by_key(|(span, _)| span.start);

    let mut redacted = String::with_capacity(text.len());
    let mut substitutions = BTreeMap::new();
    let mut cursor = 0;
    for (span, entity) in claimed {
        redacted.push_str(&text[cursor..span.start]);
        redacted.push_str(&entity.placeholder());
        cursor = span.end;
        *substitutions.entry(entity.label.clone()).or_insert(0) += 1;
    }
    redacted.push_str(&text[cursor..]);

    RedactionOutcome {
        text: redacted,
        substitutions,
    }
}

/// Whether `text[start..end]` stands as a whole word
///
/// An edge of the match that is a word character must not touch another
/// word character. Edges that are punctuation impose no constraint.
pub fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let matched = &text[start..end];
    let first = matched.chars().next();
    let last = matched.chars().next_back();
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let left_ok = !(first.is_some_and(is_word_char) && before.is_some_and(is_word_char));
    let right_ok = !(last.is_some_and(is_word_char) && after.is_some_and(is_word_char));
    left_ok && right_ok
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn span_is_empty(span: &Span) -> bool {
    span.start >= span.end
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map(|c| from + c.len_utf8())
        .unwrap_or(text.len())
}

fn occurrence_matcher(entity_text: &str) -> Option<Regex> {
    let tokens: Vec<String> = entity_text.split_whitespace().map(regex::escape).collect();
    if tokens.is_empty() {
        return None;
    }
    match RegexBuilder::new(&tokens.join(r"\s+"))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(error = %e, "Entity text could not be turned into a matcher");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntityKind;

    fn entity(kind: EntityKind, label: &str, text: &str) -> ResolvedEntity {
        ResolvedEntity::new(kind, label, text)
    }

    #[test]
    fn test_basic_substitution() {
        let entities = vec![
            entity(EntityKind::Person, "PERSON", "Иванов Иван Иванович"),
            entity(EntityKind::Person, "PERSON_2", "Петров Петр Петрович"),
        ];
        let redacted = Redactor::new().redact(
            "Иванов Иван Иванович и Петров Петр Петрович подписали договор",
            &entities,
        );
        assert_eq!(redacted, "[[PERSON]] и [[PERSON_2]] подписали договор");
    }

    #[test]
    fn test_longer_entity_wins_regardless_of_list_order() {
        let entities = vec![
            entity(EntityKind::Address, "ADDRESS_2", "Москва"),
            entity(EntityKind::Address, "ADDRESS", "г. Москва, ул. Ленина, д. 5"),
        ];
        let redacted = Redactor::new().redact(
            "Адрес: г. Москва, ул. Ленина, д. 5. Офис в Москва-Сити, Москва.",
            &entities,
        );
        assert_eq!(
            redacted,
            "Адрес: [[ADDRESS]]. Офис в [[ADDRESS_2]]-Сити, [[ADDRESS_2]]."
        );
    }

    #[test]
    fn test_word_boundaries_respected() {
        let entities = vec![entity(EntityKind::Person, "PERSON", "Иван")];
        let redacted = Redactor::new().redact("Иван Иванович и Иванов", &entities);
        assert_eq!(redacted, "[[PERSON]] Иванович и Иванов");
    }

    #[test]
    fn test_punctuation_edges_need_no_boundary() {
        let entities = vec![entity(EntityKind::Money, "MONEY", "500 руб.")];
        let redacted = Redactor::new().redact("цена 500 руб.,итого", &entities);
        assert_eq!(redacted, "цена [[MONEY]],итого");
    }

    #[test]
    fn test_whitespace_runs_and_case_variants_match() {
        let entities = vec![entity(EntityKind::Person, "PERSON", "Иванов Иван Иванович")];
        let redacted =
            Redactor::new().redact("Иванов\nИван  Иванович; ИВАНОВ ИВАН ИВАНОВИЧ", &entities);
        assert_eq!(redacted, "[[PERSON]]; [[PERSON]]");
    }

    #[test]
    fn test_existing_placeholders_are_not_rescanned() {
        let entities = vec![entity(EntityKind::Organization, "ORGANIZATION", "person")];
        let redacted = Redactor::new().redact("[[PERSON]] met person", &entities);
        assert_eq!(redacted, "[[PERSON]] met [[ORGANIZATION]]");
    }

    #[test]
    fn test_redaction_is_idempotent() {
        let entities = vec![
            entity(EntityKind::Person, "PERSON", "Иванов Иван Иванович"),
            entity(EntityKind::Person, "PERSON_2", "Иванов"),
        ];
        let once = Redactor::new().redact("Иванов Иван Иванович, Иванов", &entities);
        let twice = Redactor::new().redact(&once, &entities);
        assert_eq!(once, "[[PERSON]], [[PERSON_2]]");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_identical_text_goes_to_first_accepted_entity() {
        let entities = vec![
            entity(EntityKind::Address, "ADDRESS", "Ромашка"),
            entity(EntityKind::Organization, "ORGANIZATION", "Ромашка"),
        ];
        let outcome = Redactor::new().redact_with_stats("Ромашка и Ромашка", &entities);
        assert_eq!(outcome.text, "[[ADDRESS]] и [[ADDRESS]]");
        assert_eq!(outcome.substitutions.get("ADDRESS"), Some(&2));
        assert_eq!(outcome.substitutions.get("ORGANIZATION"), None);
        assert_eq!(outcome.total_substitutions(), 2);
    }

    #[test]
    fn test_input_and_entities_untouched() {
        let entities = vec![entity(EntityKind::Person, "PERSON", "Иванов")];
        let before = entities.clone();
        let text = String::from("Иванов");
        let _ = Redactor::new().redact(&text, &entities);
        assert_eq!(text, "Иванов");
        assert_eq!(entities, before);
    }

    #[test]
    fn test_document_spans_cover_templated_text() {
        let text = "проживает: город Москва улица Ленина";
        let start = text.find("город").unwrap();
        let mut address = entity(EntityKind::Address, "ADDRESS", "г. Москва, ул. Ленина");
        address.spans.push(Span::new(start, text.len()));

        assert_eq!(
            Redactor::new().redact_document(text, &[address.clone()]).text,
            "проживает: [[ADDRESS]]"
        );
        // Plain redaction only searches for the entity text
        assert_eq!(Redactor::new().redact(text, &[address]), text);
    }

    #[test]
    fn test_document_spans_out_of_range_are_ignored() {
        let mut person = entity(EntityKind::Person, "PERSON", "Иванов");
        person.spans.push(Span::new(3, 400));
        person.spans.push(Span::new(1, 2));
        let outcome = Redactor::new().redact_document("Иванов подписал", &[person]);
        assert_eq!(outcome.text, "[[PERSON]] подписал");
        assert_eq!(outcome.total_substitutions(), 1);
    }

    #[test]
    fn test_is_whole_word() {
        let text = "аИвановб Иванов";
        let inner = text.find("Иванов").unwrap();
        assert!(!is_whole_word(text, inner, inner + "Иванов".len()));
        let last = text.rfind("Иванов").unwrap();
        assert!(is_whole_word(text, last, text.len()));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(Redactor::new().redact("", &[]), "");
        let entities = vec![entity(EntityKind::Person, "PERSON", "   ")];
        assert_eq!(Redactor::new().redact("текст", &entities), "текст");
    }
}
