//! Entity and result models shared by every pipeline stage

pub mod entity;

pub use entity::{
    AnonymizationResult, CandidateSource, EntityKind, RawCandidate, ResolvedEntity, Span,
};
