//! Retrieval boundary between the extractor and a graph backend

use super::operation::Operation;
use super::record::RawRecord;
use thiserror::Error;

/// Failures raised by a retrieval backend. These abort the run.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Graph backend error: {0}")]
    Backend(String),

    #[error("Malformed row from graph backend: {0}")]
    MalformedRow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Executes operations against a graph.
///
/// Implementations block until the whole result is available. Connection
/// lifecycle belongs to the caller that constructs the provider.
pub trait RetrievalProvider {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    fn retrieve(&mut self, operation: &Operation) -> Result<Vec<RawRecord>, RetrievalError>;
}

impl<P: RetrievalProvider + ?Sized> RetrievalProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn retrieve(&mut self, operation: &Operation) -> Result<Vec<RawRecord>, RetrievalError> {
        (**self).retrieve(operation)
    }
}
