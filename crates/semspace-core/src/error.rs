//! Reduction error types

use thiserror::Error;

/// Errors that can occur while building matrices or reducing embeddings.
///
/// A zero-magnitude reduction is not an error: it yields the origin.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    /// Embedding is empty, too short for the chosen method, or holds non-finite values
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Projection matrix requested with a zero or unusable shape
    #[error("invalid matrix shape: {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },

    /// Configuration values out of range or unparseable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for reduction operations
pub type Result<T> = std::result::Result<T, ReduceError>;
