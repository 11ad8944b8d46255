//! The recommendation service.
//!
//! A `Recommender` is constructed once from a loaded bundle and queried many
//! times; it holds the bundle immutably and keeps no per-query state. The
//! two public operations are deliberately distinct: they are different
//! algorithms with different failure modes, not one polymorphic entry point.

use crate::bundle::ModelBundle;
use crate::error::{ModelError, Result};
use data_loader::{Catalog, RestaurantId};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Neighbor count used when the caller doesn't ask for a specific k
pub const DEFAULT_TOP_K: usize = 5;

/// One entry in the ranked-candidates output, carrying the catalog metadata
/// the booking frontend renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub name: String,
    pub address: String,
    pub rating: f32,
}

/// Immutable query-side handle over one trained bundle
pub struct Recommender {
    bundle: ModelBundle,
}

impl Recommender {
    /// Wrap a validated bundle.
    ///
    /// Re-validates so a hand-assembled bundle can't skip the load-time
    /// checks.
    pub fn new(bundle: ModelBundle) -> Result<Self> {
        bundle.validate()?;
        Ok(Self { bundle })
    }

    /// Load a bundle from disk and wrap it
    pub fn load(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            bundle: ModelBundle::load(path)?,
        })
    }

    /// The underlying bundle, for inspection
    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Recommend restaurants liked by users whose taste is closest to this
    /// one's.
    ///
    /// ## Algorithm
    /// 1. Resolve the user's matrix row; an unknown user gets an empty
    ///    result, not an error
    /// 2. Query the neighbor model for `top_k + 1` rows (the user's own row
    ///    is expected among them at distance 0)
    /// 3. Drop the user's own row by index identity, wherever it landed
    /// 4. Walk the remaining neighbors nearest-first; within each, walk
    ///    restaurant columns by descending score and collect every
    ///    positive-score restaurant not yet seen
    /// 5. Stop the whole scan as soon as `top_k` restaurants are collected
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub fn recommend_similar(&self, user_id: &str, top_k: usize) -> Result<Vec<RestaurantId>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let Some(user_index) = self.bundle.user_encoder.try_encode(user_id) else {
            debug!("User not in training vocabulary, returning no recommendations");
            return Ok(Vec::new());
        };

        let user_row = self.bundle.matrix.row(user_index);
        let neighbors = self
            .bundle
            .neighbors
            .search(&self.bundle.matrix, user_row, top_k + 1);
        debug!(neighbors = neighbors.len(), "Neighbor search complete");

        let mut recommended: Vec<RestaurantId> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        'neighbors: for neighbor in neighbors.iter().filter(|n| n.index != user_index) {
            let neighbor_row = self.bundle.matrix.row(neighbor.index);

            // Walk this neighbor's restaurants from best-loved down
            let mut columns: Vec<usize> = (0..neighbor_row.len()).collect();
            columns.sort_by(|&a, &b| {
                neighbor_row[b]
                    .partial_cmp(&neighbor_row[a])
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.cmp(&b))
            });

            for column in columns {
                if recommended.len() >= top_k {
                    break 'neighbors;
                }
                if neighbor_row[column] <= 0.0 {
                    // Scores are sorted descending; nothing further in this
                    // row is a positive signal
                    break;
                }
                if seen.insert(column) {
                    recommended.push(self.bundle.restaurant_encoder.decode(column)?.to_string());
                }
            }
        }

        debug!(recommended = recommended.len(), "Built recommendation set");
        Ok(recommended)
    }

    /// Rank candidate restaurants by the point predictor's (user, item)
    /// estimate and attach catalog metadata.
    ///
    /// Unlike the neighbor path, a candidate missing from the catalog is a
    /// surfaced error: the caller handed us an id it believes exists, and
    /// silently dropping it would hide a data problem.
    #[instrument(skip(self, candidates, catalog), fields(user_id = %user_id, candidates = candidates.len()))]
    pub fn rank_candidates(
        &self,
        user_id: &str,
        candidates: &[RestaurantId],
        catalog: &Catalog,
        top_n: usize,
    ) -> Result<Vec<RankedRestaurant>> {
        let mut scored: Vec<(&RestaurantId, f32)> = candidates
            .par_iter()
            .map(|restaurant_id| {
                (
                    restaurant_id,
                    self.bundle.predictor.predict(user_id, restaurant_id),
                )
            })
            .collect();

        // Highest predicted score first; stable sort keeps candidate order
        // for ties so output is deterministic
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);

        scored
            .into_iter()
            .map(|(restaurant_id, _score)| {
                let restaurant =
                    catalog
                        .get(restaurant_id)
                        .ok_or_else(|| ModelError::CatalogMiss {
                            restaurant_id: restaurant_id.clone(),
                        })?;
                Ok(RankedRestaurant {
                    name: restaurant.name.clone(),
                    address: restaurant.address.clone(),
                    rating: restaurant.rating,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Restaurant;
    use pipeline::Interaction;

    fn interaction(user: &str, restaurant: &str, score: f32) -> Interaction {
        Interaction {
            user_id: user.to_string(),
            restaurant_id: restaurant.to_string(),
            score,
        }
    }

    /// u1 and u2 share taste (r1, r2); u2 additionally loves r3 and r4.
    /// u3 is off in their own corner with r5.
    fn fit_recommender() -> Recommender {
        let aggregated = vec![
            interaction("u1", "r1", 5.0),
            interaction("u1", "r2", 4.0),
            interaction("u2", "r1", 5.0),
            interaction("u2", "r2", 4.0),
            interaction("u2", "r3", 5.0),
            interaction("u2", "r4", 3.0),
            interaction("u3", "r5", 4.0),
        ];
        Recommender::new(ModelBundle::fit(&aggregated).unwrap()).unwrap()
    }

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (id, name) in [
            ("r1", "Pho 24"),
            ("r2", "Banh Mi Corner"),
            ("r3", "Com Tam 37"),
            ("r4", "Lau House"),
            ("r5", "Bun Cha Lane"),
        ] {
            catalog
                .insert(Restaurant {
                    id: id.to_string(),
                    name: name.to_string(),
                    address: format!("{name} street"),
                    rating: 4.0,
                })
                .unwrap();
        }
        catalog
    }

    #[test]
    fn test_unknown_user_gets_empty_result() {
        let recommender = fit_recommender();
        for k in [0, 1, 5] {
            assert!(recommender.recommend_similar("ghost", k).unwrap().is_empty());
        }
    }

    #[test]
    fn test_recommendations_come_from_nearest_neighbor() {
        let recommender = fit_recommender();
        let recs = recommender.recommend_similar("u1", 3).unwrap();

        // u2 is the nearest neighbor; their top-scored restaurants lead
        assert!(recs.contains(&"r3".to_string()));
        assert!(recs.len() <= 3);
    }

    #[test]
    fn test_result_respects_top_k_and_has_no_duplicates() {
        let recommender = fit_recommender();
        for k in 1..=5 {
            let recs = recommender.recommend_similar("u1", k).unwrap();
            assert!(recs.len() <= k);
            let unique: HashSet<_> = recs.iter().collect();
            assert_eq!(unique.len(), recs.len());
        }
    }

    #[test]
    fn test_own_row_is_excluded_by_identity() {
        // Two users with identical rows: the twin must survive exclusion
        // even though it ties the queried user at distance 0
        let aggregated = vec![
            interaction("u1", "r1", 5.0),
            interaction("u2", "r1", 5.0),
            interaction("u2", "r2", 0.0),
        ];
        let recommender = Recommender::new(ModelBundle::fit(&aggregated).unwrap()).unwrap();

        let recs = recommender.recommend_similar("u2", 2).unwrap();
        // u1's only positive-score restaurant is r1
        assert_eq!(recs, vec!["r1".to_string()]);
    }

    #[test]
    fn test_zero_score_restaurants_never_recommended() {
        let aggregated = vec![
            interaction("u1", "r1", 5.0),
            // u2 matches u1 on r1 but scored r2 a literal zero
            interaction("u2", "r1", 5.0),
            interaction("u2", "r2", 0.0),
        ];
        let recommender = Recommender::new(ModelBundle::fit(&aggregated).unwrap()).unwrap();

        let recs = recommender.recommend_similar("u1", 5).unwrap();
        assert!(!recs.contains(&"r2".to_string()));
    }

    #[test]
    fn test_rank_candidates_sorted_and_bounded() {
        let recommender = fit_recommender();
        let catalog = test_catalog();
        let candidates: Vec<RestaurantId> = catalog.ids().cloned().collect();

        let ranked = recommender
            .rank_candidates("u1", &candidates, &catalog, 3)
            .unwrap();

        assert_eq!(ranked.len(), 3);
        // Every entry carries catalog metadata
        for entry in &ranked {
            assert!(!entry.name.is_empty());
            assert!(!entry.address.is_empty());
        }
    }

    #[test]
    fn test_rank_candidates_surfaces_catalog_miss() {
        let recommender = fit_recommender();
        let catalog = test_catalog();
        let candidates = vec!["missing-restaurant".to_string()];

        let err = recommender
            .rank_candidates("u1", &candidates, &catalog, 5)
            .unwrap_err();
        assert!(matches!(err, ModelError::CatalogMiss { .. }));
    }
}
