//! Interaction aggregation.
//!
//! Merges the three signal sources into one score per (user, restaurant)
//! pair:
//! - review: the star rating, or 0 when the reviewer left none
//! - order: the order rating, or a mild-positive fallback when absent
//! - view: a fixed weak-positive weight, regardless of anything else
//!
//! Multiple signals for the same pair are averaged, never summed, so a user
//! who both ordered and viewed doesn't outweigh a 5-star reviewer.

use data_loader::{RestaurantId, Snapshot, UserId};
use std::collections::HashMap;
use tracing::debug;

/// Score assumed for an order the customer never rated
pub const ORDER_FALLBACK_SCORE: f32 = 3.0;

/// Score carried by every view event
pub const VIEW_SCORE: f32 = 2.0;

/// One observed (user, restaurant, score) signal
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub score: f32,
}

/// Aggregate all interaction sources into per-pair mean scores.
///
/// ## Algorithm
/// 1. Concatenate the scored triples from each non-empty source, in source
///    order (reviews, orders, views)
/// 2. Group by (user, restaurant), preserving first-encounter order
/// 3. Take the arithmetic mean within each group
///
/// Empty sources are skipped entirely; they contribute nothing. An empty
/// snapshot yields an empty result, which the matrix builder rejects.
pub fn aggregate_interactions(snapshot: &Snapshot) -> Vec<Interaction> {
    let mut raw: Vec<Interaction> = Vec::new();

    if !snapshot.reviews.is_empty() {
        raw.extend(snapshot.reviews.iter().map(|review| Interaction {
            user_id: review.user_id.clone(),
            restaurant_id: review.restaurant_id.clone(),
            // A review without a rating really is a zero, not missing data
            score: review.rating.unwrap_or(0.0),
        }));
    }

    if !snapshot.orders.is_empty() {
        raw.extend(snapshot.orders.iter().map(|order| Interaction {
            user_id: order.user_id.clone(),
            restaurant_id: order.restaurant_id.clone(),
            score: order.rating.unwrap_or(ORDER_FALLBACK_SCORE),
        }));
    }

    if !snapshot.views.is_empty() {
        raw.extend(snapshot.views.iter().map(|view| Interaction {
            user_id: view.user_id.clone(),
            restaurant_id: view.restaurant_id.clone(),
            score: VIEW_SCORE,
        }));
    }

    let aggregated = mean_by_pair(raw);
    debug!(
        aggregated = aggregated.len(),
        "Aggregated interactions across sources"
    );
    aggregated
}

/// Group interactions by (user, restaurant) and average the scores.
///
/// The output keeps the order in which each pair was first seen, which makes
/// encoder assignment deterministic for a given snapshot.
fn mean_by_pair(raw: Vec<Interaction>) -> Vec<Interaction> {
    let mut totals: HashMap<(UserId, RestaurantId), (f32, u32)> = HashMap::new();
    let mut order: Vec<(UserId, RestaurantId)> = Vec::new();

    for interaction in raw {
        let key = (interaction.user_id, interaction.restaurant_id);
        let entry = totals.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0.0, 0)
        });
        entry.0 += interaction.score;
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|key| {
            let (sum, count) = totals[&key];
            Interaction {
                user_id: key.0,
                restaurant_id: key.1,
                score: sum / count as f32,
            }
        })
        .collect()
}
