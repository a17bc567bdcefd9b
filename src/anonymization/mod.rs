//! Entity extraction and anonymization
//!
//! This module turns raw legal text into redacted text plus the list of
//! entities that were removed from it.
//!
//! # Architecture
//!
//! - **Extraction**: per-doc-type regex rules ([`extractor`])
//! - **Tagging**: optional statistical tagger behind a shared capability ([`tagger`], [`gazetteer`])
//! - **Resolution**: dedup, containment and labeling ([`resolver`])
//! - **Redaction**: single-pass `[[LABEL]]` substitution ([`redactor`])
//! - **Audit**: append-only run log with hashed values ([`audit`])
//!
//! [`Pipeline`] runs the stages in order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use legalscan::anonymization::{AnonymizationConfig, Pipeline};
//!
//! let pipeline = Pipeline::from_config(&AnonymizationConfig::default())?;
//! let result = pipeline.run(text, "contract")?;
//! println!("{}", result.redacted_text);
//! ```

pub mod audit;
pub mod config;
pub mod extractor;
pub mod gazetteer;
pub mod models;
pub mod pipeline;
pub mod redactor;
pub mod resolver;
pub mod tagger;

// Re-export main types
pub use config::AnonymizationConfig;
pub use extractor::PatternExtractor;
pub use gazetteer::GazetteerTagger;
pub use models::{
    AnonymizationResult, CandidateSource, EntityKind, RawCandidate, ResolvedEntity, Span,
};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use redactor::{RedactionOutcome, Redactor};
pub use resolver::EntityResolver;
pub use tagger::{EntityTagger, NerModel, SerializedTagger, TaggedSpan};
