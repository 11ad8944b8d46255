//! Nearest-neighbor search over score-matrix rows.
//!
//! ## Algorithm
//! Exhaustive (brute-force) cosine-distance search. One row per user means
//! the candidate set is small enough that an approximate index would buy
//! nothing; the exact scan also keeps results fully deterministic.
//!
//! The model is fitted once (precomputing row norms) and never mutated by
//! queries. It does no self-exclusion: whether the query's own row belongs
//! in the result is the caller's decision.

use pipeline::ScoreMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One search result: a matrix row and its cosine distance from the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Fitted cosine-distance similarity index over the rows of a score matrix.
///
/// Stores only the per-row L2 norms; searches take the matrix by reference,
/// and the persisted bundle validates that model and matrix still pair up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborModel {
    norms: Vec<f32>,
}

impl NeighborModel {
    /// Fit the index by precomputing the L2 norm of every row
    pub fn fit(matrix: &ScoreMatrix) -> Self {
        let norms = (0..matrix.rows())
            .into_par_iter()
            .map(|row| l2_norm(matrix.row(row)))
            .collect();
        Self { norms }
    }

    /// Number of rows the model was fitted over
    pub fn rows(&self) -> usize {
        self.norms.len()
    }

    /// Find the `k` rows nearest to `query` by cosine distance.
    ///
    /// Results are ordered nearest-first; ties break on row index so the
    /// ordering is stable across runs. Returns at most `min(k, rows)`
    /// neighbors.
    ///
    /// A zero-norm row (user with no positive signal) has no direction, so
    /// it sits at the maximum distance of 1.0 from everything.
    pub fn search(&self, matrix: &ScoreMatrix, query: &[f32], k: usize) -> Vec<Neighbor> {
        debug_assert_eq!(query.len(), matrix.cols());
        debug_assert_eq!(self.norms.len(), matrix.rows());

        let query_norm = l2_norm(query);

        let mut neighbors: Vec<Neighbor> = (0..matrix.rows())
            .map(|index| {
                let similarity = if query_norm == 0.0 || self.norms[index] == 0.0 {
                    0.0
                } else {
                    dot(query, matrix.row(index)) / (query_norm * self.norms[index])
                };
                Neighbor {
                    index,
                    distance: 1.0 - similarity,
                }
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        neighbors.truncate(k);
        neighbors
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
