//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading a database snapshot
///
/// Each collection is decoded from its own export file, so every variant
/// carries enough context to point at the offending file or document.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A collection export couldn't be decoded as JSON
    #[error("Failed to decode {file}: {source}")]
    DecodeError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two catalog documents share the same identifier
    #[error("Duplicate restaurant id in catalog: {id}")]
    DuplicateId { id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
