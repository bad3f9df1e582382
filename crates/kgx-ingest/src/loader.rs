//! Loader framework
//!
//! Every data source implements [`SourceLoader`]. [`run_loader`] drives one
//! loader into a JSON-lines output directory and records what happened in
//! `metadata.json` next to the node and edge files.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kgx_common::checksum::compute_file_checksum;
use kgx_common::sink::{JsonlWriter, KgxSink};
use kgx_common::types::ChecksumAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metadata file written next to the output
pub const METADATA_FILE: &str = "metadata.json";

/// Static description of a data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub source_id: &'static str,
    pub provenance_id: &'static str,
    pub description: &'static str,
    pub source_data_url: &'static str,
    pub license: &'static str,
    pub parsing_version: &'static str,
}

/// Record counts from one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseMetadata {
    /// Every source record seen
    pub num_source_lines: u64,

    /// Records that produced no edge
    pub unusable_source_lines: u64,

    /// Identifiers built from a raw database name because no prefix was known
    #[serde(default)]
    pub prefix_fallbacks: u64,
}

impl ParseMetadata {
    pub fn usable_source_lines(&self) -> u64 {
        self.num_source_lines.saturating_sub(self.unusable_source_lines)
    }
}

/// A data source that can write itself into a KGX sink
pub trait SourceLoader {
    fn info(&self) -> SourceInfo;

    /// Local files the parse reads, fingerprinted in the run metadata
    fn input_files(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    fn parse(&mut self, sink: &mut dyn KgxSink) -> Result<ParseMetadata>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    pub sha256: String,
}

/// Summary of one loader run, serialized to [`METADATA_FILE`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadMetadata {
    pub source_id: String,
    pub provenance_id: String,
    pub source_version: String,
    pub parsing_version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub nodes_written: u64,
    pub edges_written: u64,
    #[serde(flatten)]
    pub parse: ParseMetadata,
    pub input_files: Vec<InputFile>,
}

fn fingerprint_inputs(paths: &[PathBuf]) -> Vec<InputFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match compute_file_checksum(path, ChecksumAlgorithm::Sha256) {
            Ok(sha256) => files.push(InputFile {
                path: path.clone(),
                sha256,
            }),
            Err(e) => warn!("Could not checksum input {}: {}", path.display(), e),
        }
    }
    files
}

/// Run `loader` into `output_dir` and write the run metadata
pub fn run_loader(loader: &mut dyn SourceLoader, source_version: &str, output_dir: &Path) -> Result<LoadMetadata> {
    let info = loader.info();
    let started_at = Utc::now();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    info!(
        "Loading {} (version {}) into {}",
        info.source_id,
        source_version,
        output_dir.display()
    );

    let input_files = fingerprint_inputs(&loader.input_files());

    let mut writer = JsonlWriter::create(output_dir).context("Failed to open output files")?;
    let parse = loader
        .parse(&mut writer)
        .with_context(|| format!("{} parse failed", info.source_id))?;
    writer.finish().context("Failed to flush output files")?;

    let metadata = LoadMetadata {
        source_id: info.source_id.to_string(),
        provenance_id: info.provenance_id.to_string(),
        source_version: source_version.to_string(),
        parsing_version: info.parsing_version.to_string(),
        started_at,
        finished_at: Utc::now(),
        nodes_written: writer.nodes_written(),
        edges_written: writer.edges_written(),
        parse,
        input_files,
    };

    let metadata_path = output_dir.join(METADATA_FILE);
    let file = std::fs::File::create(&metadata_path)
        .with_context(|| format!("Failed to create {}", metadata_path.display()))?;
    serde_json::to_writer_pretty(file, &metadata).context("Failed to write run metadata")?;

    info!(
        "{} done: {} records seen, {} unusable, {} nodes, {} edges",
        info.source_id,
        parse.num_source_lines,
        parse.unusable_source_lines,
        metadata.nodes_written,
        metadata.edges_written
    );

    Ok(metadata)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kgx_common::types::{KgxEdge, KgxNode};
    use tempfile::TempDir;

    struct FixedLoader {
        input: PathBuf,
    }

    impl SourceLoader for FixedLoader {
        fn info(&self) -> SourceInfo {
            SourceInfo {
                source_id: "Fixed",
                provenance_id: "infores:fixed",
                description: "two nodes and an edge",
                source_data_url: "https://example.org",
                license: "CC0",
                parsing_version: "1.0",
            }
        }

        fn input_files(&self) -> Vec<PathBuf> {
            vec![self.input.clone(), PathBuf::from("/nonexistent/input.txt")]
        }

        fn parse(&mut self, sink: &mut dyn KgxSink) -> Result<ParseMetadata> {
            sink.write_node(KgxNode::new("A:1", "a"))?;
            sink.write_node(KgxNode::new("B:2", "b"))?;
            sink.write_edge(KgxEdge::new("A:1", "biolink:related_to", "B:2", "infores:fixed"))?;
            Ok(ParseMetadata {
                num_source_lines: 3,
                unusable_source_lines: 2,
                prefix_fallbacks: 0,
            })
        }
    }

    #[test]
    fn test_usable_source_lines() {
        let meta = ParseMetadata {
            num_source_lines: 10,
            unusable_source_lines: 4,
            prefix_fallbacks: 1,
        };
        assert_eq!(meta.usable_source_lines(), 6);
    }

    #[test]
    fn test_run_loader_writes_metadata() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "hello world").unwrap();
        let output = dir.path().join("out");

        let mut loader = FixedLoader { input: input.clone() };
        let metadata = run_loader(&mut loader, "v1", &output).unwrap();

        assert_eq!(metadata.nodes_written, 2);
        assert_eq!(metadata.edges_written, 1);
        assert_eq!(metadata.parse.usable_source_lines(), 1);
        // unreadable inputs are skipped
        assert_eq!(metadata.input_files.len(), 1);
        assert_eq!(
            metadata.input_files[0].sha256,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.join(METADATA_FILE)).unwrap()).unwrap();
        assert_eq!(written["source_version"], "v1");
        assert_eq!(written["num_source_lines"], 3);
        assert_eq!(written["unusable_source_lines"], 2);
        assert!(output.join("nodes.jsonl").exists());
    }
}
