//! Rule stores
//!
//! A [`RuleStore`] maps a doc type to its compiled [`RuleSet`]. Rule sets
//! are immutable once loaded and shared as `Arc<RuleSet>`.

use super::ruleset::RuleSet;
use super::schema::RuleLibraryDefinition;
use crate::domain::{LegalScanError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Source of per-doc-type rule sets
pub trait RuleStore: Send + Sync {
    /// Load the rule set for `doc_type`
    ///
    /// Returns `Ok(None)` when the doc type is not configured. Errors are
    /// reserved for rule files that exist but violate the schema.
    fn load(&self, doc_type: &str) -> Result<Option<Arc<RuleSet>>>;

    /// Doc types this store can currently serve
    fn doc_types(&self) -> Vec<String>;
}

/// All doc types compiled eagerly from one library file
#[derive(Debug, Default)]
pub struct LibraryRuleStore {
    sets: HashMap<String, Arc<RuleSet>>,
}

impl LibraryRuleStore {
    /// Create a library store from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LegalScanError::Configuration(format!(
                "Failed to read rule library {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Create a library store from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: RuleLibraryDefinition = toml::from_str(content).map_err(|e| {
            LegalScanError::rule_schema("<library>", "<file>", format!("TOML parse error: {e}"))
        })?;

        let mut sets = HashMap::new();
        for (doc_type, definition) in library.doc_types {
            let set = RuleSet::compile(&doc_type, definition)?;
            sets.insert(doc_type, Arc::new(set));
        }

        Ok(Self { sets })
    }
}

impl RuleStore for LibraryRuleStore {
    fn load(&self, doc_type: &str) -> Result<Option<Arc<RuleSet>>> {
        Ok(self.sets.get(doc_type).cloned())
    }

    fn doc_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.keys().cloned().collect();
        names.sort();
        names
    }
}

/// One `<doc_type>.toml` per doc type, loaded on first use and cached
///
/// When several callers race on a doc type's first load, the first set
/// inserted into the cache wins and every caller receives that instance.
#[derive(Debug)]
pub struct DirectoryRuleStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<RuleSet>>>,
}

impl DirectoryRuleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn rule_file(&self, doc_type: &str) -> Option<PathBuf> {
        if !is_valid_doc_type(doc_type) {
            return None;
        }
        Some(self.dir.join(format!("{doc_type}.toml")))
    }

    fn cached(&self, doc_type: &str) -> Result<Option<Arc<RuleSet>>> {
        let cache = self
            .cache
            .read()
            .map_err(|_| LegalScanError::Other("Rule cache lock poisoned".to_string()))?;
        Ok(cache.get(doc_type).cloned())
    }
}

impl RuleStore for DirectoryRuleStore {
    fn load(&self, doc_type: &str) -> Result<Option<Arc<RuleSet>>> {
        if let Some(set) = self.cached(doc_type)? {
            return Ok(Some(set));
        }

        let Some(path) = self.rule_file(doc_type) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            LegalScanError::Configuration(format!(
                "Failed to read rule file {}: {}",
                path.display(),
                e
            ))
        })?;
        let set = Arc::new(RuleSet::from_toml(doc_type, &content)?);

        let mut cache = self
            .cache
            .write()
            .map_err(|_| LegalScanError::Other("Rule cache lock poisoned".to_string()))?;
        let winner = cache.entry(doc_type.to_string()).or_insert(set).clone();

        tracing::debug!(doc_type, path = %path.display(), "Rule set loaded");
        Ok(Some(winner))
    }

    fn doc_types(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("toml"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|name| is_valid_doc_type(name))
            .collect();
        names.sort();
        names
    }
}

/// Consults stores in order; the first store that knows a doc type wins
///
/// A store that fails for any reason other than a malformed rule schema is
/// logged and skipped, so later stores still get a chance.
pub struct ChainedRuleStore {
    stores: Vec<Arc<dyn RuleStore>>,
}

impl ChainedRuleStore {
    pub fn new(stores: Vec<Arc<dyn RuleStore>>) -> Self {
        Self { stores }
    }
}

impl RuleStore for ChainedRuleStore {
    fn load(&self, doc_type: &str) -> Result<Option<Arc<RuleSet>>> {
        for store in &self.stores {
            match store.load(doc_type) {
                Ok(Some(set)) => return Ok(Some(set)),
                Ok(None) => {}
                Err(e @ LegalScanError::RuleSchema { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(doc_type, error = %e, "Rule store failed, trying the next one");
                }
            }
        }
        Ok(None)
    }

    fn doc_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.iter().flat_map(|s| s.doc_types()).collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Doc types double as file names, so only `[A-Za-z0-9_-]` is accepted
fn is_valid_doc_type(doc_type: &str) -> bool {
    !doc_type.is_empty()
        && doc_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
