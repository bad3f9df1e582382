//! KGX record types shared by all loaders

use crate::error::{KgxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property mapping carried by nodes and edges.
///
/// Ordered so that serialized records are stable between runs.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A scalar or list property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Render a scalar as the local part of an identifier.
    ///
    /// Lists have no single textual form and return `None`, as do empty strings.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Float(f) => f.to_string(),
            PropertyValue::Text(s) => s.trim().to_string(),
            PropertyValue::List(_) => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Convert a JSON value, dropping nulls and nested objects
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(PropertyValue::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(PropertyValue::Integer(i)),
                None => n.as_f64().map(PropertyValue::Float),
            },
            serde_json::Value::String(s) => Some(PropertyValue::Text(s)),
            serde_json::Value::Array(items) => Some(PropertyValue::List(
                items.into_iter().filter_map(PropertyValue::from_json).collect(),
            )),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        PropertyValue::List(values.into_iter().map(PropertyValue::Text).collect())
    }
}

/// Returns true when `id` looks like `namespace:local-id` with both halves non-empty
pub fn is_curie(id: &str) -> bool {
    match id.split_once(':') {
        Some((prefix, local)) => !prefix.trim().is_empty() && !local.trim().is_empty(),
        None => false,
    }
}

fn ensure_curie(id: &str) -> Result<()> {
    if is_curie(id) {
        Ok(())
    } else {
        Err(KgxError::InvalidCurie(id.to_string()))
    }
}

/// A KGX node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KgxNode {
    /// Curie identifier (e.g., "NCBITaxon:9606")
    pub id: String,

    /// Display name, empty when the source has none
    #[serde(default)]
    pub name: String,

    /// Additional descriptive properties (definition, url, symbol, ...)
    #[serde(flatten)]
    pub properties: Properties,
}

impl KgxNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Check the node identifier is a usable curie
    pub fn validate(&self) -> Result<()> {
        ensure_curie(&self.id)
    }
}

/// A KGX edge record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KgxEdge {
    pub subject: String,
    pub predicate: String,
    pub object: String,

    /// Provenance tag of the loader that produced the edge (e.g., "infores:reactome")
    pub primary_knowledge_source: String,

    #[serde(flatten)]
    pub properties: Properties,
}

impl KgxEdge {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        primary_knowledge_source: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            primary_knowledge_source: primary_knowledge_source.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Check both endpoints and the predicate are usable curies
    pub fn validate(&self) -> Result<()> {
        ensure_curie(&self.subject)?;
        ensure_curie(&self.object)?;
        ensure_curie(&self.predicate)
    }
}

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
            ChecksumAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_curie() {
        assert!(is_curie("HGNC:1100"));
        assert!(is_curie("KEGG.COMPOUND:C00031"));
        assert!(!is_curie("HGNC:"));
        assert!(!is_curie(":1100"));
        assert!(!is_curie("1100"));
        assert!(!is_curie(""));
    }

    proptest! {
        #[test]
        fn prop_prefix_and_local_make_a_curie(prefix in "[A-Za-z][A-Za-z0-9.]{0,12}", local in "[A-Za-z0-9_-]{1,16}") {
            let id = format!("{}:{}", prefix, local);
            prop_assert!(is_curie(&id));
        }

        #[test]
        fn prop_text_without_colon_is_not_a_curie(text in "[^:]{0,24}") {
            prop_assert!(!is_curie(&text));
        }
    }

    #[test]
    fn test_property_value_as_text() {
        assert_eq!(PropertyValue::Integer(9606).as_text().as_deref(), Some("9606"));
        assert_eq!(PropertyValue::from(" P12345 ").as_text().as_deref(), Some("P12345"));
        assert_eq!(PropertyValue::from("").as_text(), None);
        assert_eq!(PropertyValue::from(vec!["a".to_string()]).as_text(), None);
    }

    #[test]
    fn test_property_value_from_json() {
        let value = serde_json::json!({"ignored": 1});
        assert_eq!(PropertyValue::from_json(value), None);
        assert_eq!(
            PropertyValue::from_json(serde_json::json!(["PMID:1", null])),
            Some(PropertyValue::List(vec![PropertyValue::from("PMID:1")]))
        );
        assert_eq!(PropertyValue::from_json(serde_json::json!(1.5)), Some(PropertyValue::Float(1.5)));
    }

    #[test]
    fn test_node_serializes_flat() {
        let node = KgxNode::new("GO:0005829", "cytosol").with_property("definition", "The part of the cytoplasm");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "GO:0005829");
        assert_eq!(json["name"], "cytosol");
        assert_eq!(json["definition"], "The part of the cytoplasm");
    }

    #[test]
    fn test_edge_validate() {
        let edge = KgxEdge::new("REACT:R-HSA-1", "biolink:has_input", "CHEBI:15377", "infores:reactome");
        assert!(edge.validate().is_ok());

        let broken = KgxEdge::new("", "biolink:has_input", "CHEBI:15377", "infores:reactome");
        assert!(matches!(broken.validate(), Err(KgxError::InvalidCurie(_))));
    }
}
