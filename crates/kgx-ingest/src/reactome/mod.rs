// Reactome Ingestion Module
//
// Reactome ships its pathway knowledgebase as a Neo4j graph. Instead of parsing
// flat files, this loader drives graph retrievals from a small rule table:
//
// - rules: the critical-triples table (subject type, relation, object type, mode)
// - router: resolves each rule's mode once into a typed route
// - operation: the retrieval shapes (pair with optional reference hops, collapse)
// - provider: the retrieval boundary (in-memory graph, Neo4j behind `neo4j`)
// - normalizer: node labels + properties -> curie
// - predicates: relationship label -> biolink predicate
// - extractor: runs the plan, streams nodes/edges to a sink, counts records
// - version_discovery: release number scraped from the news page
//
// Data source: https://reactome.org/download/current/reactome.graphdb.dump

pub mod extractor;
pub mod loader;
pub mod memory;
#[cfg(feature = "neo4j")]
pub mod neo4j;
pub mod normalizer;
pub mod operation;
pub mod predicates;
pub mod provider;
pub mod record;
pub mod router;
pub mod rules;
pub mod version_discovery;

// Re-export main types
pub use extractor::Extractor;
pub use loader::ReactomeLoader;
pub use memory::MemoryGraph;
#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jProvider;
pub use normalizer::{normalize, NormalizationError, NormalizedId};
pub use operation::{CollapseQuery, IntermediatePosition, Operation, PairQuery};
pub use predicates::{map_predicate, PredicateTable};
pub use provider::{RetrievalError, RetrievalProvider};
pub use record::{Endpoint, RawRecord};
pub use router::{route, Bucket, ExtractionPlan, PlannedStep, Route};
pub use rules::{InclusionMode, Rule, RuleTable};
pub use version_discovery::VersionDiscovery;

/// Source identifier used in run metadata
pub const SOURCE_ID: &str = "Reactome";

/// Provenance tag attached to every Reactome edge
pub const PROVENANCE_ID: &str = "infores:reactome";

/// Version of the extraction logic, bumped when output semantics change
pub const PARSING_VERSION: &str = "1.1";

/// Result type for Reactome operations
pub type Result<T> = std::result::Result<T, ReactomeError>;

/// Error types for Reactome extraction
#[derive(Debug, thiserror::Error)]
pub enum ReactomeError {
    #[error("Malformed rule on line {line}: expected 4 columns, found {columns}")]
    MalformedRule { line: u64, columns: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule table error: {0}")]
    RuleTable(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Output error: {0}")]
    Output(#[from] kgx_common::KgxError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Version page error: {0}")]
    VersionPage(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
