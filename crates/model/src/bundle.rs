//! The persisted model bundle.
//!
//! Everything a training run produces travels as one unit: the neighbor
//! model, the score matrix it was fitted over, the two encoders that give
//! the matrix axes meaning, and the point predictor. Deserializing any
//! subset of these against the others is undefined, so the bundle is
//! written and read as a single file and cross-validated at load time.

use crate::error::{ModelError, Result};
use crate::neighbors::NeighborModel;
use crate::predictor::PointPredictor;
use pipeline::{Encoder, Interaction, PivotedInteractions, ScoreMatrix};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Bump when the on-disk layout changes; old bundles must be retrained,
/// never reinterpreted
pub const BUNDLE_VERSION: u32 = 1;

/// One training run's complete output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub version: u32,
    pub neighbors: NeighborModel,
    pub matrix: ScoreMatrix,
    pub user_encoder: Encoder,
    pub restaurant_encoder: Encoder,
    pub predictor: PointPredictor,
}

impl ModelBundle {
    /// Fit all models from the aggregated interactions.
    ///
    /// Fails on empty input (via the matrix builder) rather than producing
    /// a degenerate bundle.
    pub fn fit(aggregated: &[Interaction]) -> Result<Self> {
        let PivotedInteractions {
            matrix,
            user_encoder,
            restaurant_encoder,
        } = pipeline::build_matrix(aggregated)?;

        let neighbors = NeighborModel::fit(&matrix);
        let predictor = PointPredictor::fit(aggregated);

        info!(
            users = matrix.rows(),
            restaurants = matrix.cols(),
            "Fitted neighbor model and point predictor"
        );

        Ok(Self {
            version: BUNDLE_VERSION,
            neighbors,
            matrix,
            user_encoder,
            restaurant_encoder,
            predictor,
        })
    }

    /// Check that the bundle's parts still pair up.
    ///
    /// Every field is validated against the matrix shape; a mismatch means
    /// the file mixes artifacts from different training runs.
    pub fn validate(&self) -> Result<()> {
        if self.version != BUNDLE_VERSION {
            return Err(ModelError::BundleMismatch {
                reason: format!(
                    "unsupported bundle version {} (expected {})",
                    self.version, BUNDLE_VERSION
                ),
            });
        }
        if self.neighbors.rows() != self.matrix.rows() {
            return Err(ModelError::BundleMismatch {
                reason: format!(
                    "neighbor model fitted over {} rows but matrix has {}",
                    self.neighbors.rows(),
                    self.matrix.rows()
                ),
            });
        }
        if self.user_encoder.len() != self.matrix.rows() {
            return Err(ModelError::BundleMismatch {
                reason: format!(
                    "user encoder knows {} users but matrix has {} rows",
                    self.user_encoder.len(),
                    self.matrix.rows()
                ),
            });
        }
        if self.restaurant_encoder.len() != self.matrix.cols() {
            return Err(ModelError::BundleMismatch {
                reason: format!(
                    "restaurant encoder knows {} restaurants but matrix has {} columns",
                    self.restaurant_encoder.len(),
                    self.matrix.cols()
                ),
            });
        }
        Ok(())
    }

    /// Write the bundle to disk as one atomic unit.
    ///
    /// Serializes into a process-private sibling temp file first and renames
    /// it over the target, so a crash mid-write never leaves a half-written
    /// bundle and concurrent trainers never clobber each other's temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));
        {
            let file = File::create(&tmp_path)?;
            let writer = BufWriter::new(file);
            bincode::serialize_into(writer, self)?;
        }
        fs::rename(&tmp_path, path)?;

        info!(path = %path.display(), "Saved model bundle");
        Ok(())
    }

    /// Read a bundle back from disk, failing fast on any inconsistency
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let bundle: ModelBundle = bincode::deserialize_from(reader)?;
        bundle.validate()?;

        info!(
            path = %path.display(),
            users = bundle.matrix.rows(),
            restaurants = bundle.matrix.cols(),
            "Loaded model bundle"
        );
        Ok(bundle)
    }
}
