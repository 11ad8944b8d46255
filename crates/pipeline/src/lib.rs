//! # Pipeline Crate
//!
//! This crate turns a raw database snapshot into the dense training inputs
//! for the recommendation models.
//!
//! ## Components
//!
//! ### Interaction Aggregator
//! Merges reviews, orders and view logs into one mean score per
//! (user, restaurant) pair, with the fixed scoring policy:
//! - review: rating, or 0 when absent
//! - order: rating, or 3 when absent
//! - view: always 2
//!
//! ### Matrix Builder
//! Assigns dense indices to users and restaurants (bidirectional encoders)
//! and pivots the aggregated scores into a dense matrix, 0.0 where no
//! interaction was observed.
//!
//! ## Example Usage
//!
//! ```ignore
//! use pipeline::{aggregate_interactions, build_matrix};
//!
//! let aggregated = aggregate_interactions(&snapshot);
//! let pivoted = build_matrix(&aggregated)?;
//! println!("{} users x {} restaurants", pivoted.matrix.rows(), pivoted.matrix.cols());
//! ```

// Public modules
pub mod error;
pub mod interactions;
pub mod matrix;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use interactions::{aggregate_interactions, Interaction, ORDER_FALLBACK_SCORE, VIEW_SCORE};
pub use matrix::{build_matrix, Encoder, PivotedInteractions, ScoreMatrix};
