//! In-memory property graph provider
//!
//! Holds nodes (identity, labels, properties) and typed directed relationships,
//! and answers operations the way the generated Cypher would. Used by tests and
//! for small exported subgraphs loaded from JSON:
//!
//! ```json
//! {
//!   "nodes": [{"id": 1, "labels": ["Pathway"], "properties": {"stId": "R-HSA-1"}}],
//!   "relationships": [{"start": 1, "end": 2, "type": "hasEvent"}]
//! }
//! ```

use super::operation::{
    CollapseQuery, IntermediatePosition, Operation, PairQuery, INTERMEDIATE_TYPE, INTO_INTERMEDIATE,
    OUT_OF_INTERMEDIATE, REFERENCE_RELATIONSHIPS,
};
use super::provider::{RetrievalError, RetrievalProvider};
use super::record::{Endpoint, RawRecord};
use kgx_common::types::{Properties, PropertyValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: i64,
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "graph_properties")]
    pub properties: Properties,
}

/// Exported properties read the same way Neo4j values are: nulls and maps are dropped
fn graph_properties<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| PropertyValue::from_json(value).map(|value| (key, value)))
        .collect())
}

impl GraphNode {
    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn endpoint(&self, properties: &Properties) -> Endpoint {
        Endpoint {
            identity: self.id,
            labels: self.labels.clone(),
            properties: properties.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub start: i64,
    pub end: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryGraph {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    relationships: Vec<GraphRelationship>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; a later node with the same id replaces the earlier one
    pub fn node(mut self, id: i64, labels: &[&str], properties: Properties) -> Self {
        self.nodes.retain(|n| n.id != id);
        self.nodes.push(GraphNode {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        });
        self
    }

    pub fn relate(mut self, start: i64, kind: &str, end: i64) -> Self {
        self.relationships.push(GraphRelationship {
            start,
            end,
            kind: kind.to_string(),
        });
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, RetrievalError> {
        let graph: Self = serde_json::from_str(json)?;
        graph.check_relationships()?;
        Ok(graph)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let graph = Self::from_json_str(&contents)?;
        debug!(
            "Loaded graph from {}: {} nodes, {} relationships",
            path.as_ref().display(),
            graph.nodes.len(),
            graph.relationships.len()
        );
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    fn check_relationships(&self) -> Result<(), RetrievalError> {
        let index = self.index();
        for rel in &self.relationships {
            for id in [rel.start, rel.end] {
                if !index.contains_key(&id) {
                    return Err(RetrievalError::MalformedRow(format!(
                        "relationship {} references unknown node {}",
                        rel.kind, id
                    )));
                }
            }
        }
        Ok(())
    }

    fn index(&self) -> HashMap<i64, &GraphNode> {
        self.nodes.iter().map(|n| (n.id, n)).collect()
    }

    /// Property sets to report for `node`: its own, or one per linked reference entity
    fn property_sets<'a>(
        &'a self,
        index: &HashMap<i64, &'a GraphNode>,
        node: &'a GraphNode,
        hop: bool,
    ) -> Vec<&'a Properties> {
        if !hop {
            return vec![&node.properties];
        }

        self.relationships
            .iter()
            .filter(|rel| REFERENCE_RELATIONSHIPS.contains(&rel.kind.as_str()))
            .filter_map(|rel| {
                if rel.start == node.id {
                    index.get(&rel.end).copied()
                } else if rel.end == node.id {
                    index.get(&rel.start).copied()
                } else {
                    None
                }
            })
            .map(|reference| &reference.properties)
            .collect()
    }

    fn records_for(
        &self,
        index: &HashMap<i64, &GraphNode>,
        subject: (&GraphNode, bool),
        relationship: &str,
        object: (&GraphNode, bool),
        records: &mut Vec<RawRecord>,
    ) {
        let object_sets = self.property_sets(index, object.0, object.1);
        for subject_props in self.property_sets(index, subject.0, subject.1) {
            for object_props in &object_sets {
                records.push(RawRecord {
                    subject: subject.0.endpoint(subject_props),
                    relationship: relationship.to_string(),
                    object: object.0.endpoint(object_props),
                });
            }
        }
    }

    fn run_pair(&self, query: &PairQuery) -> Vec<RawRecord> {
        let index = self.index();
        let mut records = Vec::new();

        for rel in self.relationships.iter().filter(|r| r.kind == query.relation) {
            let (Some(s), Some(o)) = (index.get(&rel.start), index.get(&rel.end)) else {
                continue;
            };
            if !s.has_label(&query.subject_type) || !o.has_label(&query.object_type) {
                continue;
            }

            let subject = (*s, query.subject_reference);
            let object = (*o, query.object_reference);
            if query.switch {
                self.records_for(&index, object, &rel.kind, subject, &mut records);
            } else {
                self.records_for(&index, subject, &rel.kind, object, &mut records);
            }
        }

        records
    }

    fn run_collapse(&self, query: &CollapseQuery) -> Vec<RawRecord> {
        let index = self.index();
        let mut records = Vec::new();

        // (s)-[first_kind]->(x:Intermediate)-[activity]->(o)
        let first_kind = match query.intermediate {
            IntermediatePosition::Subject => INTO_INTERMEDIATE,
            IntermediatePosition::Object => query.relation.as_str(),
        };

        for first_rel in self.relationships.iter().filter(|r| r.kind == first_kind) {
            let (Some(s), Some(x)) = (index.get(&first_rel.start), index.get(&first_rel.end)) else {
                continue;
            };
            if !x.has_label(INTERMEDIATE_TYPE) {
                continue;
            }
            if query.intermediate == IntermediatePosition::Object && !s.has_label(&query.subject_type) {
                continue;
            }

            for second_rel in self
                .relationships
                .iter()
                .filter(|r| r.kind == OUT_OF_INTERMEDIATE && r.start == x.id)
            {
                let Some(o) = index.get(&second_rel.end) else {
                    continue;
                };
                if query.intermediate == IntermediatePosition::Subject && !o.has_label(&query.object_type) {
                    continue;
                }

                // the reported relationship is whichever hop touches the typed endpoint
                let (s_hop, o_hop, reported) = match query.intermediate {
                    IntermediatePosition::Subject => (false, query.far_reference, &second_rel.kind),
                    IntermediatePosition::Object => (query.far_reference, false, &first_rel.kind),
                };
                self.records_for(&index, (*s, s_hop), reported, (*o, o_hop), &mut records);
            }
        }

        records
    }
}

impl RetrievalProvider for MemoryGraph {
    fn name(&self) -> &str {
        "memory"
    }

    fn retrieve(&mut self, operation: &Operation) -> Result<Vec<RawRecord>, RetrievalError> {
        let records = match operation {
            Operation::Pair(query) => self.run_pair(query),
            Operation::Collapse(query) => self.run_collapse(query),
        };
        debug!("{} -> {} records", operation, records.len());
        Ok(records)
    }
}
