//! Pipeline error types.

use thiserror::Error;

/// Streaming pipeline errors.
///
/// Every variant is fatal for the run: the model is stateful, so a
/// skipped or retried record would desynchronize its temporal context.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// No model configuration exists for the requested dataset
    #[error("No model params exist for '{0}'. Run swarm first!")]
    MissingModelParams(String),

    /// Model params file exists but cannot be parsed
    #[error("Invalid model params: {0}")]
    InvalidParams(String),

    /// Input schema could not be built from the header rows
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A data row did not match the declared schema
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// The external model failed while processing a record
    #[error("Model error: {0}")]
    Model(String),

    /// An output sink failed to accept a write
    #[error("Sink error: {0}")]
    Sink(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, StreamError>;
