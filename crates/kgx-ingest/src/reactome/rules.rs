//! Critical-triples rule table
//!
//! Each row names a subject node type, a relationship, an object node type and
//! an inclusion mode tag. The first row is a header. Rows must have exactly four
//! columns; anything else aborts the run.

use super::{ReactomeError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Rule table shipped with the loader
pub const DEFAULT_RULE_TABLE: &str = include_str!("../../data/reactome_critical_triples.csv");

const RULE_COLUMNS: usize = 4;

/// How a rule's triples are brought into the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InclusionMode {
    /// `Include`
    Include,
    /// `Include/SwitchSO`
    IncludeSwitched,
    /// `IDMapping/Include`
    IdMapping,
    /// `RDF_edges/Include`
    RdfEdge,
    /// `Provenance/Include` and `Attribute/Include`
    PropertyWrite,
}

impl InclusionMode {
    /// Resolve a tag from the table; unknown tags resolve to `None`
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Include" => Some(InclusionMode::Include),
            "Include/SwitchSO" => Some(InclusionMode::IncludeSwitched),
            "IDMapping/Include" => Some(InclusionMode::IdMapping),
            "RDF_edges/Include" => Some(InclusionMode::RdfEdge),
            "Provenance/Include" | "Attribute/Include" => Some(InclusionMode::PropertyWrite),
            _ => None,
        }
    }
}

/// One row of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub subject_type: String,
    pub relation: String,
    pub object_type: String,

    /// Tag exactly as written in the table
    pub tag: String,

    /// Mode resolved from `tag` when the table is read
    pub mode: Option<InclusionMode>,
}

impl Rule {
    pub fn new(
        subject_type: impl Into<String>,
        relation: impl Into<String>,
        object_type: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        let tag = tag.into();
        Self {
            subject_type: subject_type.into(),
            relation: relation.into(),
            object_type: object_type.into(),
            mode: InclusionMode::from_tag(&tag),
            tag,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({})-[{}]->({}) [{}]",
            self.subject_type, self.relation, self.object_type, self.tag
        )
    }
}

/// Immutable, ordered set of rules for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The table compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_reader(DEFAULT_RULE_TABLE.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse comma-separated rows, discarding the header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rules = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.len() != RULE_COLUMNS {
                return Err(ReactomeError::MalformedRule {
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    columns: record.len(),
                });
            }
            rules.push(Rule::new(&record[0], &record[1], &record[2], &record[3]));
        }

        debug!("Read {} rules", rules.len());
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(InclusionMode::from_tag("Include"), Some(InclusionMode::Include));
        assert_eq!(InclusionMode::from_tag("Include/SwitchSO"), Some(InclusionMode::IncludeSwitched));
        assert_eq!(InclusionMode::from_tag("IDMapping/Include"), Some(InclusionMode::IdMapping));
        assert_eq!(InclusionMode::from_tag("RDF_edges/Include"), Some(InclusionMode::RdfEdge));
        assert_eq!(InclusionMode::from_tag("Attribute/Include"), Some(InclusionMode::PropertyWrite));
        assert_eq!(InclusionMode::from_tag("Provenance/Include"), Some(InclusionMode::PropertyWrite));
        assert_eq!(InclusionMode::from_tag("Exclude"), None);
        assert_eq!(InclusionMode::from_tag(""), None);
    }

    #[test]
    fn test_header_is_discarded() {
        let table = RuleTable::from_reader(
            "subject,predicate,object,include\nPathway,hasEvent,Reaction,Include\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        let rule = &table.rules()[0];
        assert_eq!(rule.subject_type, "Pathway");
        assert_eq!(rule.relation, "hasEvent");
        assert_eq!(rule.object_type, "Reaction");
        assert_eq!(rule.mode, Some(InclusionMode::Include));
    }

    #[test]
    fn test_unknown_tag_is_kept_unresolved() {
        let table = RuleTable::from_reader("s,p,o,i\nPathway,hasEvent,Reaction,Maybe\n".as_bytes()).unwrap();
        assert_eq!(table.rules()[0].mode, None);
        assert_eq!(table.rules()[0].tag, "Maybe");
    }

    #[test]
    fn test_wrong_column_count_is_fatal() {
        let err = RuleTable::from_reader(
            "s,p,o,i\nPathway,hasEvent,Reaction,Include\nPathway,hasEvent,Include\n".as_bytes(),
        )
        .unwrap_err();

        match err {
            ReactomeError::MalformedRule { line, columns } => {
                assert_eq!(line, 3);
                assert_eq!(columns, 3);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_embedded_table_parses() {
        let table = RuleTable::embedded().unwrap();
        assert!(!table.is_empty());
        assert!(table.rules().iter().all(|r| r.mode.is_some()));
    }
}
