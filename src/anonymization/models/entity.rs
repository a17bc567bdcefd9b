//! Entity data models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of sensitive-data categories recognized in legal documents
///
/// Declaration order is also the ordering used for per-kind statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Full names of natural persons
    Person,
    /// Postal addresses and geographic locations
    Address,
    /// Companies, agencies and other organizations
    Organization,
    /// Monetary amounts
    Money,
    /// Calendar dates
    Date,
    /// Passport series and number
    Passport,
    /// Telephone numbers
    Phone,
    /// Contract terms and other durations
    Duration,
    /// Email addresses
    Email,
    /// Bank account and card numbers
    Account,
}

impl EntityKind {
    /// All kinds in declaration order
    pub const ALL: [EntityKind; 10] = [
        Self::Person,
        Self::Address,
        Self::Organization,
        Self::Money,
        Self::Date,
        Self::Passport,
        Self::Phone,
        Self::Duration,
        Self::Email,
        Self::Account,
    ];

    /// Bare label used for the first entity of this kind and in placeholders
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Address => "ADDRESS",
            Self::Organization => "ORGANIZATION",
            Self::Money => "MONEY",
            Self::Date => "DATE",
            Self::Passport => "PASSPORT",
            Self::Phone => "PHONE",
            Self::Duration => "DURATION",
            Self::Email => "EMAIL",
            Self::Account => "ACCOUNT",
        }
    }

    /// Map a statistical tagger's native label onto an entity kind
    ///
    /// This is the single fixed mapping table for every tagger backend.
    /// Labels outside the table return `None` and are dropped.
    pub fn from_tagger_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "PER" | "PERSON" => Some(Self::Person),
            "LOC" | "LOCATION" | "GPE" => Some(Self::Address),
            "ORG" | "ORGANIZATION" => Some(Self::Organization),
            "MONEY" => Some(Self::Money),
            "DATE" => Some(Self::Date),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Parse a kind name from a rule file
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PERSON" | "PER" => Ok(Self::Person),
            "ADDRESS" | "LOC" => Ok(Self::Address),
            "ORGANIZATION" | "ORG" => Ok(Self::Organization),
            "MONEY" => Ok(Self::Money),
            "DATE" => Ok(Self::Date),
            "PASSPORT" => Ok(Self::Passport),
            "PHONE" => Ok(Self::Phone),
            "DURATION" => Ok(Self::Duration),
            "EMAIL" => Ok(Self::Email),
            "ACCOUNT" => Ok(Self::Account),
            _ => Err(format!("Unknown entity kind: {s}")),
        }
    }
}

/// Where a candidate came from
///
/// Variant order is the resolver's tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Rule pattern match
    RuleBased,
    /// Statistical tagger output
    Statistical,
}

/// Byte offset range `[start, end)` into the analyzed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A single occurrence found by the pattern extractor or the tagger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub kind: EntityKind,
    /// Trimmed, single-spaced candidate text
    pub text: String,
    pub span: Span,
    pub source: CandidateSource,
}

impl RawCandidate {
    pub fn new(kind: EntityKind, text: impl Into<String>, span: Span, source: CandidateSource) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            source,
        }
    }

    /// Candidate length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A deduplicated, labeled entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub kind: EntityKind,
    /// `KIND` for the first distinct entity of a kind, `KIND_n` afterwards
    pub label: String,
    pub text: String,
    /// Where the entity was found in the analyzed text
    ///
    /// Covers every accepted or duplicate candidate of this entity. A
    /// templated candidate's text may not occur in the source at all, so
    /// redaction of the analyzed document claims these spans directly.
    #[serde(skip)]
    pub spans: Vec<Span>,
}

impl ResolvedEntity {
    pub fn new(kind: EntityKind, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Placeholder token that replaces this entity's text
    pub fn placeholder(&self) -> String {
        format!("[[{}]]", self.label)
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub doc_type: String,
    pub redacted_text: String,
    /// Entities in acceptance order (longest text first)
    pub entities: Vec<ResolvedEntity>,
}

impl AnonymizationResult {
    /// Check if any entity was found
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Number of distinct entities per kind
    pub fn stats_by_kind(&self) -> BTreeMap<EntityKind, usize> {
        let mut stats = BTreeMap::new();
        for entity in &self.entities {
            *stats.entry(entity.kind).or_insert(0) += 1;
        }
        stats
    }

    /// One `[LABEL] text` line per entity, in acceptance order
    pub fn entity_summary(&self) -> String {
        self.entities
            .iter()
            .map(|e| format!("[{}] {}", e.label, e.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("PER", Some(EntityKind::Person))]
    #[test_case("person", Some(EntityKind::Person))]
    #[test_case("LOC", Some(EntityKind::Address))]
    #[test_case("GPE", Some(EntityKind::Address))]
    #[test_case("ORG", Some(EntityKind::Organization))]
    #[test_case("MONEY", Some(EntityKind::Money))]
    #[test_case("DATE", Some(EntityKind::Date))]
    #[test_case("MISC", None)]
    #[test_case("PASSPORT", None)]
    fn test_tagger_label_mapping(label: &str, expected: Option<EntityKind>) {
        assert_eq!(EntityKind::from_tagger_label(label), expected);
    }

    #[test]
    fn test_kind_round_trips_through_label() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.label().parse::<EntityKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("SSN".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_as_label() {
        let json = serde_json::to_string(&EntityKind::Organization).unwrap();
        assert_eq!(json, "\"ORGANIZATION\"");
    }

    #[test]
    fn test_rule_based_sorts_before_statistical() {
        assert!(CandidateSource::RuleBased < CandidateSource::Statistical);
    }

    #[test]
    fn test_span_relations() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(&Span::new(2, 5)));
        assert!(!outer.contains(&Span::new(8, 12)));
        assert!(outer.overlaps(&Span::new(8, 12)));
        assert!(!outer.overlaps(&Span::new(10, 12)));
    }

    #[test]
    fn test_char_len_counts_cyrillic_characters() {
        let candidate = RawCandidate::new(
            EntityKind::Person,
            "ТС",
            Span::new(0, 4),
            CandidateSource::RuleBased,
        );
        assert_eq!(candidate.char_len(), 2);
    }

    #[test]
    fn test_result_summary_and_stats() {
        let result = AnonymizationResult {
            doc_type: "contract".to_string(),
            redacted_text: "[[PERSON]] и [[PERSON_2]]".to_string(),
            entities: vec![
                ResolvedEntity::new(EntityKind::Person, "PERSON", "Иванов Иван Иванович"),
                ResolvedEntity::new(EntityKind::Person, "PERSON_2", "Петров Петр Петрович"),
            ],
        };

        assert!(result.has_entities());
        assert_eq!(result.stats_by_kind().get(&EntityKind::Person), Some(&2));
        assert_eq!(
            result.entity_summary(),
            "[PERSON] Иванов Иван Иванович\n[PERSON_2] Петров Петр Петрович"
        );
    }
}
