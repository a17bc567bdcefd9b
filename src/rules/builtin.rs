//! Built-in rule library
//!
//! Shipped with the binary and used whenever no rule directory overrides a
//! doc type. Provides the `general` and `contract` doc types.

use super::store::LibraryRuleStore;
use crate::domain::Result;

/// Embedded rule library TOML
pub const BUILTIN_RULES: &str = include_str!("../../rules/builtin.toml");

/// Compile the built-in rule library
pub fn builtin_store() -> Result<LibraryRuleStore> {
    LibraryRuleStore::from_toml(BUILTIN_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntityKind;
    use crate::rules::RuleStore;

    #[test]
    fn test_builtin_library_compiles_without_skips() {
        let store = builtin_store().unwrap();
        assert_eq!(
            store.doc_types(),
            vec!["contract".to_string(), "general".to_string()]
        );
        for doc_type in store.doc_types() {
            let set = store.load(&doc_type).unwrap().unwrap();
            assert!(!set.is_empty());
            assert_eq!(set.skipped_patterns(), 0, "{doc_type} has invalid patterns");
        }
    }

    #[test]
    fn test_contract_account_rule_uses_backtracking_engine() {
        let store = builtin_store().unwrap();
        let contract = store.load("contract").unwrap().unwrap();
        let account = contract
            .rules()
            .iter()
            .find(|r| r.kind() == EntityKind::Account)
            .unwrap();
        assert!(account.patterns()[0].is_backtracking());
    }

    #[test]
    fn test_builtin_stoplist() {
        let store = builtin_store().unwrap();
        let contract = store.load("contract").unwrap().unwrap();
        assert!(contract.is_stoplisted(EntityKind::Person, "ТС"));
        assert!(contract.is_stoplisted(EntityKind::Person, "Арендатор"));
    }
}
