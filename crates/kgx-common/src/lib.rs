//! KGX Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, output sinks, and error handling for the KGX loaders.
//!
//! # Overview
//!
//! This crate provides functionality used by every loader in the workspace:
//!
//! - **Error Handling**: the [`KgxError`] type and [`Result`] alias
//! - **Types**: KGX nodes, edges and property values
//! - **Sinks**: the [`sink::KgxSink`] trait plus JSON-lines and in-memory writers
//! - **Checksums**: input file fingerprints recorded in run metadata
//! - **Logging**: `tracing` subscriber setup shared by the binaries
//!
//! # Example
//!
//! ```no_run
//! use kgx_common::sink::{JsonlWriter, KgxSink};
//! use kgx_common::types::KgxNode;
//!
//! fn write_one(dir: &str) -> kgx_common::Result<()> {
//!     let mut writer = JsonlWriter::create(dir)?;
//!     writer.write_node(KgxNode::new("HGNC:5", "alpha-1-B glycoprotein"))?;
//!     writer.finish()?;
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod prefixes;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use error::{KgxError, Result};
