//! Score matrix construction.
//!
//! Pivots the aggregated interactions into a dense user-by-restaurant
//! matrix, assigning each distinct identifier a dense integer index via a
//! bidirectional `Encoder`. Index values are an artifact of one training
//! run; they are deterministic for a given snapshot but carry no meaning
//! across retrains.

use crate::error::{PipelineError, Result};
use crate::interactions::Interaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// Encoder
// =============================================================================

/// Bijective mapping between opaque string identifiers and dense indices.
///
/// Indices are assigned in first-encounter order. Lookups for identifiers
/// the encoder never saw fail explicitly; silently defaulting would let an
/// unknown user alias row 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoder {
    forward: HashMap<String, usize>,
    backward: Vec<String>,
    /// What this encoder indexes ("user" or "restaurant"), for error messages
    kind: String,
}

impl Encoder {
    /// Creates a new, empty encoder for the given identifier kind
    pub fn new(kind: &str) -> Self {
        Self {
            forward: HashMap::new(),
            backward: Vec::new(),
            kind: kind.to_string(),
        }
    }

    /// Return the index for an identifier, assigning the next free one if
    /// this is its first encounter.
    pub fn fit(&mut self, id: &str) -> usize {
        if let Some(&index) = self.forward.get(id) {
            return index;
        }
        let index = self.backward.len();
        self.forward.insert(id.to_string(), index);
        self.backward.push(id.to_string());
        index
    }

    /// Look up the index for a known identifier
    pub fn encode(&self, id: &str) -> Result<usize> {
        self.forward
            .get(id)
            .copied()
            .ok_or_else(|| PipelineError::UnknownIdentifier {
                kind: self.kind.clone(),
                id: id.to_string(),
            })
    }

    /// Like [`Encoder::encode`] but for callers that treat absence as a
    /// normal outcome rather than an error
    pub fn try_encode(&self, id: &str) -> Option<usize> {
        self.forward.get(id).copied()
    }

    /// Look up the identifier for a dense index
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.backward
            .get(index)
            .map(|s| s.as_str())
            .ok_or_else(|| PipelineError::IndexOutOfRange {
                kind: self.kind.clone(),
                index,
                size: self.backward.len(),
            })
    }

    /// Number of distinct identifiers seen
    pub fn len(&self) -> usize {
        self.backward.len()
    }

    /// True if the encoder has seen no identifiers
    pub fn is_empty(&self) -> bool {
        self.backward.is_empty()
    }
}

// =============================================================================
// ScoreMatrix
// =============================================================================

/// Dense user-by-restaurant score matrix, row-major.
///
/// Cell value is the aggregated score for that (user, restaurant) pair;
/// 0.0 marks a pair with no observed interaction (a real zero, not a
/// missing-data sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ScoreMatrix {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of user rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of restaurant columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One user's full score row
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Score for one (user, restaurant) cell
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }
}

// =============================================================================
// Matrix Builder
// =============================================================================

/// The pivoted matrix together with its paired encoders.
///
/// These three only make sense as a unit; the encoders define what the
/// matrix axes mean.
#[derive(Debug, Clone)]
pub struct PivotedInteractions {
    pub matrix: ScoreMatrix,
    pub user_encoder: Encoder,
    pub restaurant_encoder: Encoder,
}

/// Pivot aggregated interactions into a dense score matrix.
///
/// Fails with [`PipelineError::EmptyInteractions`] when there are no records
/// at all; a 0x0 matrix downstream would just defer the failure to a less
/// obvious place.
pub fn build_matrix(aggregated: &[Interaction]) -> Result<PivotedInteractions> {
    if aggregated.is_empty() {
        return Err(PipelineError::EmptyInteractions);
    }

    let mut user_encoder = Encoder::new("user");
    let mut restaurant_encoder = Encoder::new("restaurant");

    // First pass: assign dense indices in first-encounter order
    for interaction in aggregated {
        user_encoder.fit(&interaction.user_id);
        restaurant_encoder.fit(&interaction.restaurant_id);
    }

    // Second pass: fill the matrix. Aggregation already collapsed duplicate
    // pairs, so every cell is written at most once.
    let mut matrix = ScoreMatrix::zeros(user_encoder.len(), restaurant_encoder.len());
    for interaction in aggregated {
        let row = user_encoder.encode(&interaction.user_id)?;
        let col = restaurant_encoder.encode(&interaction.restaurant_id)?;
        matrix.set(row, col, interaction.score);
    }

    debug!(
        users = matrix.rows(),
        restaurants = matrix.cols(),
        "Built score matrix"
    );

    Ok(PivotedInteractions {
        matrix,
        user_encoder,
        restaurant_encoder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(user: &str, restaurant: &str, score: f32) -> Interaction {
        Interaction {
            user_id: user.to_string(),
            restaurant_id: restaurant.to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_interactions_fail() {
        let err = build_matrix(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInteractions));
    }

    #[test]
    fn test_matrix_shape_matches_distinct_counts() {
        let aggregated = vec![
            interaction("u1", "r1", 3.5),
            interaction("u1", "r2", 3.0),
            interaction("u2", "r1", 2.0),
        ];

        let pivoted = build_matrix(&aggregated).unwrap();
        assert_eq!(pivoted.matrix.rows(), 2);
        assert_eq!(pivoted.matrix.cols(), 2);
    }

    #[test]
    fn test_unobserved_cells_are_zero() {
        let aggregated = vec![
            interaction("u1", "r1", 3.5),
            interaction("u2", "r2", 4.0),
        ];

        let pivoted = build_matrix(&aggregated).unwrap();
        let u1 = pivoted.user_encoder.encode("u1").unwrap();
        let u2 = pivoted.user_encoder.encode("u2").unwrap();
        let r1 = pivoted.restaurant_encoder.encode("r1").unwrap();
        let r2 = pivoted.restaurant_encoder.encode("r2").unwrap();

        assert_eq!(pivoted.matrix.get(u1, r1), 3.5);
        assert_eq!(pivoted.matrix.get(u1, r2), 0.0);
        assert_eq!(pivoted.matrix.get(u2, r1), 0.0);
        assert_eq!(pivoted.matrix.get(u2, r2), 4.0);
    }

    #[test]
    fn test_encoder_round_trip() {
        let aggregated = vec![
            interaction("u1", "r1", 1.0),
            interaction("u2", "r2", 2.0),
        ];
        let pivoted = build_matrix(&aggregated).unwrap();

        for id in ["u1", "u2"] {
            let index = pivoted.user_encoder.encode(id).unwrap();
            assert_eq!(pivoted.user_encoder.decode(index).unwrap(), id);
        }
    }

    #[test]
    fn test_unseen_identifier_fails_explicitly() {
        let pivoted = build_matrix(&[interaction("u1", "r1", 1.0)]).unwrap();

        let err = pivoted.user_encoder.encode("ghost").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownIdentifier { .. }));
        assert!(pivoted.user_encoder.try_encode("ghost").is_none());

        let err = pivoted.restaurant_encoder.decode(99).unwrap_err();
        assert!(matches!(err, PipelineError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_indices_follow_first_encounter_order() {
        let aggregated = vec![
            interaction("u9", "r9", 1.0),
            interaction("u1", "r1", 1.0),
        ];
        let pivoted = build_matrix(&aggregated).unwrap();

        assert_eq!(pivoted.user_encoder.encode("u9").unwrap(), 0);
        assert_eq!(pivoted.user_encoder.encode("u1").unwrap(), 1);
        assert_eq!(pivoted.restaurant_encoder.encode("r9").unwrap(), 0);
    }
}
