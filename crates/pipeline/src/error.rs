//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors that can occur while aggregating interactions and building the
/// score matrix
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No interaction records at all; there is nothing to pivot on
    #[error("No interactions found across orders, reviews and views; cannot build a score matrix")]
    EmptyInteractions,

    /// An identifier was looked up in an encoder that never saw it
    #[error("Unknown {kind} identifier: {id}")]
    UnknownIdentifier { kind: String, id: String },

    /// A dense index was out of range for an encoder
    #[error("Index {index} out of range for {kind} encoder of size {size}")]
    IndexOutOfRange {
        kind: String,
        index: usize,
        size: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
