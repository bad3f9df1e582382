//! Raw records returned by a retrieval provider

use kgx_common::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

/// One end of a retrieved relationship.
///
/// `labels` and `identity` always describe the typed entity the rule matched.
/// When the retrieval hopped through a reference entity, `properties` are the
/// reference's properties (`databaseName`, `identifier`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Internal graph identity, only used for diagnostics
    pub identity: i64,
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Endpoint {
    pub fn new(identity: i64, labels: &[&str], properties: Properties) -> Self {
        Self {
            identity,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn has_any_label(&self, candidates: &[&str]) -> bool {
        self.labels.iter().any(|l| candidates.contains(&l.as_str()))
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Scalar property rendered as text; `None` when absent, empty or a list
    pub fn text(&self, key: &str) -> Option<String> {
        self.property(key).and_then(PropertyValue::as_text)
    }
}

/// A retrieved (subject)-[relationship]->(object) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub subject: Endpoint,
    pub relationship: String,
    pub object: Endpoint,
}
