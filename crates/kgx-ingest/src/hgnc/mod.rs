// HGNC Ingestion Module
//
// Gene to gene family membership from the HGNC complete set, a tab-separated
// file with one approved gene per row. Multi-valued columns use `|`.
//
// Data source: https://ftp.ebi.ac.uk/pub/databases/genenames/hgnc/tsv/hgnc_complete_set.txt

use crate::config::{HgncConfig, IngestConfig, HGNC_DATA_FILE};
use crate::loader::{ParseMetadata, SourceInfo, SourceLoader};
use kgx_common::prefixes::{self, curie};
use kgx_common::sink::KgxSink;
use kgx_common::types::{is_curie, KgxEdge, KgxNode, PropertyValue};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SOURCE_ID: &str = "HGNC";
pub const PROVENANCE_ID: &str = "infores:hgnc";
pub const PARSING_VERSION: &str = "1.0";

/// Family -> gene predicate
pub const HAS_PART: &str = "biolink:has_part";

/// Relation the edge was asserted with upstream
pub const ORIGINAL_PREDICATE: &str = "BFO:0000051";

/// Result type for HGNC operations
pub type Result<T> = std::result::Result<T, HgncError>;

/// Error types for HGNC parsing
#[derive(Debug, thiserror::Error)]
pub enum HgncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {0}")]
    Output(#[from] kgx_common::KgxError),
}

/// The columns used from one complete-set row
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HgncRow {
    #[serde(default)]
    pub hgnc_id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub locus_group: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "gene_group")]
    pub gene_family: String,
    #[serde(default, alias = "gene_group_id")]
    pub gene_family_id: String,
    #[serde(default)]
    pub pubmed_id: String,
}

fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value.split('|').map(str::trim).filter(|v| !v.is_empty())
}

impl HgncRow {
    /// `(family id, family name)` pairs, matched by position before empty ids are dropped
    pub fn families(&self) -> Vec<(&str, &str)> {
        let mut names = self.gene_family.split('|').map(str::trim);
        self.gene_family_id
            .split('|')
            .map(|id| (id.trim(), names.next().unwrap_or_default()))
            .filter(|(id, _)| !id.is_empty())
            .collect()
    }

    pub fn publications(&self) -> Vec<String> {
        split_multi(&self.pubmed_id).map(|id| curie(prefixes::PMID, id)).collect()
    }

    fn gene_node(&self) -> KgxNode {
        KgxNode::new(&self.hgnc_id, &self.name)
            .with_property("locus_group", self.locus_group.as_str())
            .with_property("symbol", self.symbol.as_str())
            .with_property("location", self.location.as_str())
    }

    /// Write the gene, its families and one membership edge per family
    fn emit(&self, sink: &mut dyn KgxSink) -> Result<()> {
        sink.write_node(self.gene_node())?;

        let publications = self.publications();

        for (family_id, family_name) in self.families() {
            let family_curie = curie(prefixes::HGNC_FAMILY, family_id);
            sink.write_node(KgxNode::new(&family_curie, family_name))?;

            let mut edge = KgxEdge::new(&family_curie, HAS_PART, &self.hgnc_id, PROVENANCE_ID)
                .with_property("original_predicate", ORIGINAL_PREDICATE);
            if !publications.is_empty() {
                edge = edge.with_property("publications", PropertyValue::from(publications.clone()));
            }
            sink.write_edge(edge)?;
        }
        Ok(())
    }
}

/// Parse a complete-set stream into `sink`.
///
/// Rows whose first field starts with `?` are dropped without being counted.
/// Counted rows without a gene family (or without a usable HGNC id) are unusable.
pub fn parse_reader<R: Read>(reader: R, sink: &mut dyn KgxSink, parse_limit: Option<usize>) -> Result<ParseMetadata> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);
    let headers = tsv.headers()?.clone();

    let mut metadata = ParseMetadata::default();
    let mut record = csv::StringRecord::new();

    while tsv.read_record(&mut record)? {
        if record.get(0).is_some_and(|first| first.starts_with('?')) {
            continue;
        }
        if parse_limit.is_some_and(|limit| metadata.num_source_lines as usize >= limit) {
            debug!("Parse limit of {} rows reached", metadata.num_source_lines);
            break;
        }

        metadata.num_source_lines += 1;
        let row: HgncRow = record.deserialize(Some(&headers))?;

        if row.families().is_empty() || !is_curie(&row.hgnc_id) {
            metadata.unusable_source_lines += 1;
            continue;
        }
        row.emit(sink)?;
    }

    info!(
        "Parsed {} HGNC rows, {} without a gene family",
        metadata.num_source_lines, metadata.unusable_source_lines
    );
    Ok(metadata)
}

/// HGNC gene family loader
#[derive(Debug, Clone)]
pub struct HgncLoader {
    data_file: PathBuf,
    parse_limit: Option<usize>,
}

impl HgncLoader {
    pub fn new(data_file: impl Into<PathBuf>, config: &HgncConfig) -> Self {
        Self {
            data_file: data_file.into(),
            parse_limit: config.parse_limit,
        }
    }

    /// Loader reading the complete set from the configured data directory
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.source_dir(SOURCE_ID).join(HGNC_DATA_FILE), &config.hgnc)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// HGNC publishes continuously; the load date stands in for a version
    pub fn latest_source_version() -> String {
        chrono::Local::now().format("%m/%d/%Y").to_string()
    }
}

impl SourceLoader for HgncLoader {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            source_id: SOURCE_ID,
            provenance_id: PROVENANCE_ID,
            description: "HUGO Gene Nomenclature Committee gene to gene family membership",
            source_data_url: "https://www.genenames.org/",
            license: "https://www.genenames.org/about/license/",
            parsing_version: PARSING_VERSION,
        }
    }

    fn input_files(&self) -> Vec<PathBuf> {
        vec![self.data_file.clone()]
    }

    fn parse(&mut self, sink: &mut dyn KgxSink) -> anyhow::Result<ParseMetadata> {
        let file = std::fs::File::open(&self.data_file)?;
        Ok(parse_reader(std::io::BufReader::new(file), sink, self.parse_limit)?)
    }
}
