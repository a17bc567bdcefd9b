//! Rule storage and compilation
//!
//! Rules are configured per doc type in TOML, validated and compiled once,
//! and then shared read-only between pipeline runs.
//!
//! # Example Rule File
//!
//! ```toml
//! min_length = 3
//! enable_fallback = true
//! stoplist = ["тс"]
//!
//! [[rules]]
//! kind = "PERSON"
//! case_sensitive = true
//! patterns = ['[А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+']
//! ```

pub mod builtin;
pub mod pattern;
pub mod ruleset;
pub mod schema;
pub mod store;

pub use builtin::builtin_store;
pub use pattern::{normalize_whitespace, CompiledPattern, PatternMatch, PatternScan};
pub use ruleset::{Rule, RuleSet};
pub use store::{ChainedRuleStore, DirectoryRuleStore, LibraryRuleStore, RuleStore};
