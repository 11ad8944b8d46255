//! Error types for the model crate.

use thiserror::Error;

/// Errors that can occur while fitting, persisting or querying models
#[derive(Error, Debug)]
pub enum ModelError {
    /// An upstream aggregation or encoding failure
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),

    /// A persisted bundle is internally inconsistent
    ///
    /// The bundle's parts (model, matrix, encoders) only make sense
    /// together; any cross-field mismatch means the file cannot be trusted.
    #[error("Model bundle mismatch: {reason}")]
    BundleMismatch { reason: String },

    /// A ranked restaurant has no catalog entry to take metadata from
    #[error("Restaurant {restaurant_id} not found in catalog")]
    CatalogMiss { restaurant_id: String },

    /// I/O error while reading or writing a bundle file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Bundle (de)serialization failed
    #[error("Bundle serialization error: {0}")]
    SerializeError(#[from] bincode::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
