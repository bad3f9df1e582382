//! Reactome as a [`SourceLoader`]

use super::extractor::Extractor;
use super::memory::MemoryGraph;
use super::predicates::PredicateTable;
use super::provider::RetrievalProvider;
use super::rules::RuleTable;
use super::{Result, PARSING_VERSION, PROVENANCE_ID, SOURCE_ID};
use crate::config::{Neo4jConfig, ReactomeConfig};
use crate::loader::{ParseMetadata, SourceInfo, SourceLoader};
use kgx_common::sink::KgxSink;
use std::path::PathBuf;
use tracing::info;

pub struct ReactomeLoader {
    rules: RuleTable,
    provider: Box<dyn RetrievalProvider>,
    predicates: PredicateTable,
    inputs: Vec<PathBuf>,
}

impl ReactomeLoader {
    pub fn new(rules: RuleTable, provider: Box<dyn RetrievalProvider>) -> Self {
        Self {
            rules,
            provider,
            predicates: PredicateTable::default(),
            inputs: Vec::new(),
        }
    }

    /// Read the rules and open the provider the configuration points at.
    ///
    /// An exported graph file wins over a Neo4j connection.
    pub fn from_config(config: &ReactomeConfig, neo4j: &Neo4jConfig) -> Result<Self> {
        let rules = load_rules(config)?;
        let mut inputs: Vec<PathBuf> = config.rule_table.iter().cloned().collect();

        let provider: Box<dyn RetrievalProvider> = match &config.graph_file {
            Some(path) => {
                info!("Extracting from exported graph {}", path.display());
                inputs.push(path.clone());
                Box::new(MemoryGraph::from_json_file(path)?)
            },
            None => connect_neo4j(neo4j)?,
        };

        Ok(Self {
            inputs,
            ..Self::new(rules, provider)
        })
    }

    pub fn with_predicates(mut self, predicates: PredicateTable) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

/// The configured rule table, or the embedded one
pub fn load_rules(config: &ReactomeConfig) -> Result<RuleTable> {
    let rules = match &config.rule_table {
        Some(path) => RuleTable::from_path(path)?,
        None => RuleTable::embedded()?,
    };
    info!("Loaded {} Reactome rules", rules.len());
    Ok(rules)
}

#[cfg(feature = "neo4j")]
fn connect_neo4j(config: &Neo4jConfig) -> Result<Box<dyn RetrievalProvider>> {
    info!("Extracting from Neo4j at {}", config.uri);
    Ok(Box::new(super::neo4j::Neo4jProvider::connect(config)?))
}

#[cfg(not(feature = "neo4j"))]
fn connect_neo4j(_config: &Neo4jConfig) -> Result<Box<dyn RetrievalProvider>> {
    Err(super::ReactomeError::Config(
        "no REACTOME_GRAPH_FILE set and this build has no Neo4j support (enable the `neo4j` feature)".to_string(),
    ))
}

impl SourceLoader for ReactomeLoader {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            source_id: SOURCE_ID,
            provenance_id: PROVENANCE_ID,
            description: "Reactome is a free, open-source, curated and peer-reviewed pathway database",
            source_data_url: "https://reactome.org/",
            license: "https://reactome.org/license",
            parsing_version: PARSING_VERSION,
        }
    }

    fn input_files(&self) -> Vec<PathBuf> {
        self.inputs.clone()
    }

    fn parse(&mut self, sink: &mut dyn KgxSink) -> anyhow::Result<ParseMetadata> {
        let extractor = Extractor::new(&self.rules).with_predicates(self.predicates.clone());
        Ok(extractor.run(self.provider.as_mut(), sink)?)
    }
}
