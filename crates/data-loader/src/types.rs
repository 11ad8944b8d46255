//! Core domain types for the booking-platform snapshot.
//!
//! Documents come out of the booking database as JSON exports, one file per
//! collection. Identifiers are opaque ObjectId strings; we never interpret
//! them, only compare and index by them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user ids with
// restaurant ids in signatures, even though both are opaque strings.

/// Unique identifier for a user (ObjectId rendered as a string)
pub type UserId = String;

/// Unique identifier for a restaurant (ObjectId rendered as a string)
pub type RestaurantId = String;

// =============================================================================
// Interaction-log Types
// =============================================================================

/// One completed order.
///
/// `rating` is the post-visit feedback the customer may leave on the order;
/// most orders never get one, so it is optional here and the scoring policy
/// downstream decides what absence means.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One written review with an optional star rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub content: Option<String>,
    /// Sentiment label attached by the review moderation pipeline, if any
    #[serde(default)]
    pub sentiment: Option<String>,
}

/// One page-view event. Carries no rating; every view is the same
/// weak-positive signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
}

/// One search query. Present in the snapshot but unused by the
/// recommendation core; we load it so `stats` can report on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub keyword: Option<String>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A restaurant as listed in the catalog collection.
///
/// Only the fields the recommender needs survive the export; `rating` here is
/// the restaurant's overall catalog rating, not a per-user score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub rating: f32,
}

// =============================================================================
// Catalog - Indexed Restaurant Lookup
// =============================================================================

/// Indexed view over the restaurant collection.
///
/// Provides O(1) lookup by restaurant id while preserving the export order
/// for deterministic iteration.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Restaurants in export order
    restaurants: Vec<Restaurant>,
    /// Restaurant id -> position in `restaurants`
    by_id: HashMap<RestaurantId, usize>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a restaurant into the catalog.
    ///
    /// Returns an error if the id is already present; duplicate catalog ids
    /// mean the export is corrupt.
    pub fn insert(&mut self, restaurant: Restaurant) -> crate::error::Result<()> {
        if self.by_id.contains_key(&restaurant.id) {
            return Err(crate::error::DataLoadError::DuplicateId {
                id: restaurant.id.clone(),
            });
        }
        self.by_id
            .insert(restaurant.id.clone(), self.restaurants.len());
        self.restaurants.push(restaurant);
        Ok(())
    }

    /// Get a restaurant by id
    pub fn get(&self, id: &str) -> Option<&Restaurant> {
        self.by_id.get(id).map(|&i| &self.restaurants[i])
    }

    /// Iterate over restaurants in export order
    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> {
        self.restaurants.iter()
    }

    /// All restaurant ids in export order
    pub fn ids(&self) -> impl Iterator<Item = &RestaurantId> {
        self.restaurants.iter().map(|r| &r.id)
    }

    /// Number of restaurants in the catalog
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// True if the catalog holds no restaurants
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

// =============================================================================
// Snapshot - One Export of the Whole Database
// =============================================================================

/// All collections from one database export.
///
/// The snapshot owns the raw interaction logs plus the indexed catalog.
/// Everything downstream (aggregation, training) borrows from it; a training
/// run never mutates a snapshot.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
    pub views: Vec<ViewLog>,
    pub searches: Vec<SearchLog>,
    pub catalog: Catalog,
}

impl Snapshot {
    /// Creates a new, empty Snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection counts as (orders, reviews, views, searches, restaurants)
    pub fn counts(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.orders.len(),
            self.reviews.len(),
            self.views.len(),
            self.searches.len(),
            self.catalog.len(),
        )
    }
}
