//! Reactome relationship label -> Biolink predicate

use super::{ReactomeError, Result};
use kgx_common::types::is_curie;
use std::collections::HashMap;

/// Relationships Reactome edges are emitted for
const PREDICATE_MAPPING: &[(&str, &str)] = &[
    ("compartment", "biolink:occurs_in"),
    ("output", "biolink:has_output"),
    ("input", "biolink:has_input"),
    ("hasEvent", "biolink:contains_process"),
    ("precedingEvent", "biolink:precedes"),
    ("activeUnit", "biolink:actively_involves"),
    ("hasComponent", "biolink:has_part"),
    ("catalystActivity", "biolink:actively_involves"),
    ("cellType", "biolink:located_in"),
    ("goBiologicalProcess", "biolink:subclass_of"),
    ("disease", "biolink:disease_has_basis_in"),
];

/// Look a relationship label up in the built-in table
pub fn map_predicate(label: &str) -> Option<&'static str> {
    PREDICATE_MAPPING
        .iter()
        .find(|(relationship, _)| *relationship == label)
        .map(|(_, predicate)| *predicate)
}

/// Predicate table used by one extraction run.
///
/// Starts from the built-in mapping; extra entries shadow built-in ones.
#[derive(Debug, Clone, Default)]
pub struct PredicateTable {
    extra: HashMap<String, String>,
}

impl PredicateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, label: impl Into<String>, predicate: impl Into<String>) -> Self {
        self.extra.insert(label.into(), predicate.into());
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.extra.get(label).map(String::as_str).or_else(|| map_predicate(label))
    }

    /// Every extra predicate must be a curie
    pub fn validate(&self) -> Result<()> {
        let mut invalid: Vec<String> = self
            .extra
            .iter()
            .filter(|(_, predicate)| !is_curie(predicate))
            .map(|(label, predicate)| format!("{label} -> {predicate:?}"))
            .collect();
        if invalid.is_empty() {
            return Ok(());
        }

        invalid.sort();
        Err(ReactomeError::Config(format!(
            "Predicate mapping is not a curie: {}",
            invalid.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(map_predicate("hasEvent"), Some("biolink:contains_process"));
        assert_eq!(map_predicate("catalystActivity"), Some("biolink:actively_involves"));
        assert_eq!(map_predicate("disease"), Some("biolink:disease_has_basis_in"));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(map_predicate("summation"), None);
        assert_eq!(map_predicate("HasEvent"), None);
    }

    #[test]
    fn test_extra_mapping_shadows_builtin() {
        let table = PredicateTable::new()
            .with_mapping("taxId_edge", "biolink:in_taxon")
            .with_mapping("input", "biolink:consumes");

        assert_eq!(table.get("taxId_edge"), Some("biolink:in_taxon"));
        assert_eq!(table.get("input"), Some("biolink:consumes"));
        assert_eq!(table.get("output"), Some("biolink:has_output"));
        assert_eq!(table.get("literatureReference"), None);
    }

    #[test]
    fn test_builtin_table_validates() {
        assert!(PredicateTable::new().validate().is_ok());
        assert!(PREDICATE_MAPPING.iter().all(|(_, predicate)| is_curie(predicate)));
    }

    #[test]
    fn test_non_curie_predicate_is_rejected() {
        let table = PredicateTable::new()
            .with_mapping("taxId_edge", "biolink:in_taxon")
            .with_mapping("x", "related_to");

        let err = table.validate().unwrap_err();
        assert!(matches!(&err, ReactomeError::Config(msg) if msg.contains("related_to")));
        assert!(!err.to_string().contains("in_taxon"));
    }
}
