//! Retrieval operations built from rules
//!
//! An operation describes what to pull out of the graph for one rule. Providers
//! execute it; [`Operation::to_cypher`] is the query the Neo4j provider sends and
//! the reference semantics the in-memory graph follows.

use super::normalizer::CROSS_MAPPED_TYPES;
use super::rules::Rule;
use std::fmt;

/// Relationship types that link an entity to its reference entity
pub const REFERENCE_RELATIONSHIPS: &[&str] = &["referenceEntity", "crossReference"];

/// Node type folded away by collapsing rules
pub const INTERMEDIATE_TYPE: &str = "CatalystActivity";

/// Fixed relationship leading into the intermediate
pub const INTO_INTERMEDIATE: &str = "catalystActivity";

/// Fixed relationship leading out of the intermediate
pub const OUT_OF_INTERMEDIATE: &str = "activity";

/// Direct (subject)-[relation]->(object) retrieval with optional reference hops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairQuery {
    pub subject_type: String,
    pub relation: String,
    pub object_type: String,

    /// Read the subject's identifiers from its reference entity
    pub subject_reference: bool,

    /// Read the object's identifiers from its reference entity
    pub object_reference: bool,

    /// Report the object-side node as the record subject
    pub switch: bool,
}

impl PairQuery {
    /// Build the retrieval for `rule`, hopping on each side whose type is cross-mapped
    pub fn for_rule(rule: &Rule, switch: bool) -> Self {
        Self {
            subject_type: rule.subject_type.clone(),
            relation: rule.relation.clone(),
            object_type: rule.object_type.clone(),
            subject_reference: CROSS_MAPPED_TYPES.contains(&rule.subject_type.as_str()),
            object_reference: CROSS_MAPPED_TYPES.contains(&rule.object_type.as_str()),
            switch,
        }
    }

    pub fn has_reference_hop(&self) -> bool {
        self.subject_reference || self.object_reference
    }
}

/// Which end of a collapsing rule is the intermediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntermediatePosition {
    /// `any -[catalystActivity]-> (intermediate) -[activity]-> object`, reported as `activity`
    Subject,
    /// `subject -[relation]-> (intermediate) -[activity]-> any`
    Object,
}

/// Two-hop chain through the intermediate, reported as one relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseQuery {
    pub subject_type: String,
    pub relation: String,
    pub object_type: String,
    pub intermediate: IntermediatePosition,

    /// Read the typed far endpoint's identifiers from its reference entity
    pub far_reference: bool,
}

impl CollapseQuery {
    /// `None` when neither rule endpoint is the intermediate type
    pub fn for_rule(rule: &Rule) -> Option<Self> {
        let (intermediate, far_type) = if rule.subject_type == INTERMEDIATE_TYPE {
            (IntermediatePosition::Subject, &rule.object_type)
        } else if rule.object_type == INTERMEDIATE_TYPE {
            (IntermediatePosition::Object, &rule.subject_type)
        } else {
            return None;
        };

        Some(Self {
            subject_type: rule.subject_type.clone(),
            relation: rule.relation.clone(),
            object_type: rule.object_type.clone(),
            intermediate,
            far_reference: CROSS_MAPPED_TYPES.contains(&far_type.as_str()),
        })
    }
}

/// A retrieval the extractor asks a provider to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Pair(PairQuery),
    Collapse(CollapseQuery),
}

impl Operation {
    /// Cypher returning `a_*` (record subject), `r_type` and `b_*` (record object)
    pub fn to_cypher(&self) -> String {
        let mut clauses = Vec::new();

        let (subject_var, subject_props, object_var, object_props) = match self {
            Operation::Pair(q) => {
                clauses.push(format!(
                    "MATCH (s:{})-[r:{}]->(o:{})",
                    quote(&q.subject_type),
                    quote(&q.relation),
                    quote(&q.object_type)
                ));
                let s_props = if q.subject_reference {
                    clauses.push(reference_match("s", "s_ref"));
                    "s_ref"
                } else {
                    "s"
                };
                let o_props = if q.object_reference {
                    clauses.push(reference_match("o", "o_ref"));
                    "o_ref"
                } else {
                    "o"
                };

                if q.switch {
                    ("o", o_props, "s", s_props)
                } else {
                    ("s", s_props, "o", o_props)
                }
            },
            Operation::Collapse(q) => match q.intermediate {
                IntermediatePosition::Subject => {
                    clauses.push(format!(
                        "MATCH (s)-[:{}]->(x:{})-[r:{}]->(o:{})",
                        quote(INTO_INTERMEDIATE),
                        quote(INTERMEDIATE_TYPE),
                        quote(OUT_OF_INTERMEDIATE),
                        quote(&q.object_type)
                    ));
                    if q.far_reference {
                        clauses.push(reference_match("o", "o_ref"));
                        ("s", "s", "o", "o_ref")
                    } else {
                        ("s", "s", "o", "o")
                    }
                },
                IntermediatePosition::Object => {
                    clauses.push(format!(
                        "MATCH (s:{})-[r:{}]->(x:{})-[:{}]->(o)",
                        quote(&q.subject_type),
                        quote(&q.relation),
                        quote(INTERMEDIATE_TYPE),
                        quote(OUT_OF_INTERMEDIATE)
                    ));
                    if q.far_reference {
                        clauses.push(reference_match("s", "s_ref"));
                        ("s", "s_ref", "o", "o")
                    } else {
                        ("s", "s", "o", "o")
                    }
                },
            },
        };

        clauses.push(format!(
            "RETURN id({subject_var}) AS a_id, labels({subject_var}) AS a_labels, \
             properties({subject_props}) AS a_props, type(r) AS r_type, \
             id({object_var}) AS b_id, labels({object_var}) AS b_labels, \
             properties({object_props}) AS b_props"
        ));
        clauses.join(" ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Pair(q) => {
                let s_hop = if q.subject_reference { "(ref)-" } else { "" };
                let o_hop = if q.object_reference { "-(ref)" } else { "" };
                let switched = if q.switch { " switched" } else { "" };
                write!(
                    f,
                    "pair {s_hop}({})-[{}]->({}){o_hop}{switched}",
                    q.subject_type, q.relation, q.object_type
                )
            },
            Operation::Collapse(q) => match q.intermediate {
                IntermediatePosition::Subject => write!(
                    f,
                    "collapse ()-[{INTO_INTERMEDIATE}]->({})-[{OUT_OF_INTERMEDIATE}]->({})",
                    q.subject_type, q.object_type
                ),
                IntermediatePosition::Object => write!(
                    f,
                    "collapse ({})-[{}]->({})-[{OUT_OF_INTERMEDIATE}]->()",
                    q.subject_type, q.relation, q.object_type
                ),
            },
        }
    }
}

fn quote(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn reference_match(from: &str, to: &str) -> String {
    format!("MATCH ({from})-[:{}]-({to})", REFERENCE_RELATIONSHIPS.join("|"))
}
