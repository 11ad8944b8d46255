//! # Model Crate
//!
//! This crate implements the trained side of the recommender: the models, the
//! persisted bundle that carries them between training and inference, and the
//! query-side service.
//!
//! ## Components
//!
//! ### Neighbor Model
//! Brute-force cosine-distance search over score-matrix rows.
//! "Users whose score rows point the same way have the same taste."
//!
//! ### Point Predictor
//! Baseline bias estimator producing a direct (user, restaurant) score for
//! the candidate-ranking path.
//!
//! ### Model Bundle
//! The `{neighbors, matrix, encoders, predictor}` unit, written and read
//! atomically and cross-validated at load time.
//!
//! ### Recommender
//! Constructed once per process from a loaded bundle; exposes the two named
//! query operations, `recommend_similar` and `rank_candidates`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{ModelBundle, Recommender};
//! use std::path::Path;
//!
//! // Offline: fit and persist
//! let bundle = ModelBundle::fit(&aggregated)?;
//! bundle.save(Path::new("model/bundle.bin"))?;
//!
//! // Online: one load, many queries
//! let recommender = Recommender::load(Path::new("model/bundle.bin"))?;
//! let recs = recommender.recommend_similar("64f1c2...", 5)?;
//! ```

// Public modules
pub mod bundle;
pub mod error;
pub mod neighbors;
pub mod predictor;
pub mod service;

// Re-export commonly used types
pub use bundle::{ModelBundle, BUNDLE_VERSION};
pub use error::{ModelError, Result};
pub use neighbors::{Neighbor, NeighborModel};
pub use predictor::PointPredictor;
pub use service::{RankedRestaurant, Recommender, DEFAULT_TOP_K};
