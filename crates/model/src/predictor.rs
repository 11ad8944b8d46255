//! Point prediction of a single (user, restaurant) score.
//!
//! ## Algorithm
//! Baseline bias estimator over the aggregated interactions:
//!
//! ```text
//! predict(u, i) = clamp(mu + b_u + b_i, 0, 5)
//! ```
//!
//! where `mu` is the global mean score, `b_u` is the user's mean residual
//! against `mu`, and `b_i` is the restaurant's mean residual against
//! `mu + b_u`. Biases are keyed by raw string id, so a candidate outside
//! the training vocabulary simply contributes a zero bias and the estimate
//! degrades toward the global mean.
//!
//! This is a different model from the neighbor index: it answers "how would
//! this user score this restaurant" directly, without consulting similar
//! users, and backs the candidate-ranking path.

use pipeline::Interaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scores are kept on the 0-5 rating scale
const SCORE_MIN: f32 = 0.0;
const SCORE_MAX: f32 = 5.0;

/// Regression-style model estimating one (user, restaurant) score directly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointPredictor {
    global_mean: f32,
    user_bias: HashMap<String, f32>,
    item_bias: HashMap<String, f32>,
}

impl PointPredictor {
    /// Fit the estimator on the aggregated interactions.
    ///
    /// An empty slice yields the trivial model (always the clamp of 0.0);
    /// training rejects empty input before ever getting here.
    pub fn fit(aggregated: &[Interaction]) -> Self {
        if aggregated.is_empty() {
            return Self::default();
        }

        let global_mean =
            aggregated.iter().map(|i| i.score).sum::<f32>() / aggregated.len() as f32;

        // User bias: mean residual of the user's scores against the global mean
        let mut user_acc: HashMap<&str, (f32, u32)> = HashMap::new();
        for interaction in aggregated {
            let entry = user_acc.entry(&interaction.user_id).or_insert((0.0, 0));
            entry.0 += interaction.score - global_mean;
            entry.1 += 1;
        }
        let user_bias: HashMap<String, f32> = user_acc
            .into_iter()
            .map(|(id, (sum, count))| (id.to_string(), sum / count as f32))
            .collect();

        // Item bias: mean residual after removing global mean and user bias
        let mut item_acc: HashMap<&str, (f32, u32)> = HashMap::new();
        for interaction in aggregated {
            let b_u = user_bias.get(&interaction.user_id).copied().unwrap_or(0.0);
            let entry = item_acc
                .entry(&interaction.restaurant_id)
                .or_insert((0.0, 0));
            entry.0 += interaction.score - global_mean - b_u;
            entry.1 += 1;
        }
        let item_bias = item_acc
            .into_iter()
            .map(|(id, (sum, count))| (id.to_string(), sum / count as f32))
            .collect();

        Self {
            global_mean,
            user_bias,
            item_bias,
        }
    }

    /// Estimate the score this user would give this restaurant
    pub fn predict(&self, user_id: &str, restaurant_id: &str) -> f32 {
        let b_u = self.user_bias.get(user_id).copied().unwrap_or(0.0);
        let b_i = self.item_bias.get(restaurant_id).copied().unwrap_or(0.0);
        (self.global_mean + b_u + b_i).clamp(SCORE_MIN, SCORE_MAX)
    }

    /// Global mean score the model was fitted with
    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    /// Number of users with a fitted bias
    pub fn users(&self) -> usize {
        self.user_bias.len()
    }

    /// Number of restaurants with a fitted bias
    pub fn items(&self) -> usize {
        self.item_bias.len()
    }
}
