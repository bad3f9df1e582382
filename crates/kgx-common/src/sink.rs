//! Output sinks for KGX node and edge records
//!
//! Loaders stream every record through a [`KgxSink`] as soon as it is produced.
//! Deduplication of nodes that share an identifier is left to whatever consumes
//! the output; sinks only refuse records whose identifiers are not curies.

use crate::error::Result;
use crate::types::{KgxEdge, KgxNode};
use serde_jsonlines::JsonLinesWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the node stream inside an output directory
pub const NODES_FILE: &str = "nodes.jsonl";

/// File name of the edge stream inside an output directory
pub const EDGES_FILE: &str = "edges.jsonl";

/// Destination for normalized records
pub trait KgxSink {
    fn write_node(&mut self, node: KgxNode) -> Result<()>;

    fn write_edge(&mut self, edge: KgxEdge) -> Result<()>;
}

impl<S: KgxSink + ?Sized> KgxSink for &mut S {
    fn write_node(&mut self, node: KgxNode) -> Result<()> {
        (**self).write_node(node)
    }

    fn write_edge(&mut self, edge: KgxEdge) -> Result<()> {
        (**self).write_edge(edge)
    }
}

/// Writes `nodes.jsonl` and `edges.jsonl` into a directory
pub struct JsonlWriter {
    nodes: JsonLinesWriter<BufWriter<File>>,
    edges: JsonLinesWriter<BufWriter<File>>,
    output_dir: PathBuf,
    nodes_written: u64,
    edges_written: u64,
}

impl JsonlWriter {
    /// Create the output directory (if needed) and truncate both streams
    pub fn create(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;

        let nodes = File::create(output_dir.join(NODES_FILE))?;
        let edges = File::create(output_dir.join(EDGES_FILE))?;

        Ok(Self {
            nodes: JsonLinesWriter::new(BufWriter::new(nodes)),
            edges: JsonLinesWriter::new(BufWriter::new(edges)),
            output_dir,
            nodes_written: 0,
            edges_written: 0,
        })
    }

    pub fn nodes_written(&self) -> u64 {
        self.nodes_written
    }

    pub fn edges_written(&self) -> u64 {
        self.edges_written
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Flush both streams to disk
    pub fn finish(&mut self) -> Result<()> {
        self.nodes.flush()?;
        self.edges.flush()?;
        debug!(
            nodes = self.nodes_written,
            edges = self.edges_written,
            dir = %self.output_dir.display(),
            "KGX output flushed"
        );
        Ok(())
    }
}

impl KgxSink for JsonlWriter {
    fn write_node(&mut self, node: KgxNode) -> Result<()> {
        node.validate()?;
        self.nodes.write(&node)?;
        self.nodes_written += 1;
        Ok(())
    }

    fn write_edge(&mut self, edge: KgxEdge) -> Result<()> {
        edge.validate()?;
        self.edges.write(&edge)?;
        self.edges_written += 1;
        Ok(())
    }
}

/// Collects records in memory, in emission order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub nodes: Vec<KgxNode>,
    pub edges: Vec<KgxEdge>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KgxSink for MemorySink {
    fn write_node(&mut self, node: KgxNode) -> Result<()> {
        node.validate()?;
        self.nodes.push(node);
        Ok(())
    }

    fn write_edge(&mut self, edge: KgxEdge) -> Result<()> {
        edge.validate()?;
        self.edges.push(edge);
        Ok(())
    }
}
