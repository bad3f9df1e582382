//! Error types for the KGX loaders

use thiserror::Error;

/// Result type alias for KGX operations
pub type Result<T> = std::result::Result<T, KgxError>;

/// Errors raised while writing KGX output or reading shared settings
#[derive(Error, Debug)]
pub enum KgxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A node or edge identifier without a `prefix:local` shape
    #[error("Invalid identifier: {0:?}")]
    InvalidCurie(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
