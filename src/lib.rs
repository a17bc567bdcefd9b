// LegalScan - Personal Data Redaction for Legal Documents
// Copyright (c) 2025 LegalScan Contributors
// Licensed under the MIT License

//! # LegalScan - Personal Data Redaction for Legal Documents
//!
//! LegalScan finds names, addresses, organizations, amounts, dates and
//! identifiers in the text of legal documents and replaces each one with a
//! stable placeholder such as `[[PERSON]]` or `[[PERSON_2]]`.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** candidates with per-doc-type regex rules
//! - **Tagging** additional candidates through an injected statistical tagger
//! - **Resolving** candidates into deduplicated, labeled entities
//! - **Redacting** text with boundary-safe, longest-first substitution
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Extraction, resolution, redaction and the pipeline
//! - [`rules`] - Rule schema, compilation and stores
//! - [`domain`] - Error and result types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use legalscan::anonymization::Pipeline;
//! use legalscan::config::load_config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("legalscan.toml")?;
//!     let pipeline = Pipeline::from_config(&config.anonymization)?;
//!
//!     let result = pipeline.run("Иванов Иван Иванович подписал договор", "contract")?;
//!     println!("{}", result.redacted_text);
//!     for entity in &result.entities {
//!         println!("{} -> {}", entity.label, entity.kind);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fatal conditions surface as [`domain::LegalScanError`]. Missing rules, a
//! failing pattern or an unavailable tagger only reduce what is found.
//!
//! ## Logging
//!
//! LegalScan logs through `tracing`; entity text is never logged above
//! `debug`.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod rules;
