//! KGX Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loaders that turn third-party pathway and nomenclature datasets into KGX
//! node and edge files.
//!
//! # Supported Data Sources
//!
//! - **Reactome**: pathway knowledgebase, extracted from its graph database through
//!   a table of critical triples
//! - **HGNC**: gene to gene family membership from the HGNC complete set
//!
//! # Example
//!
//! ```no_run
//! use kgx_ingest::config::IngestConfig;
//! use kgx_ingest::loader::run_loader;
//! use kgx_ingest::reactome::ReactomeLoader;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::from_env();
//!     let mut loader = ReactomeLoader::from_config(&config.reactome, &config.neo4j)?;
//!     run_loader(&mut loader, "V92", &config.source_output_dir("Reactome"))?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fetch;
pub mod hgnc;
pub mod loader;
pub mod reactome;

pub use loader::{run_loader, LoadMetadata, ParseMetadata, SourceInfo, SourceLoader};
