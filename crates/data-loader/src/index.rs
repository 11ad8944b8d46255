//! Snapshot loading and validation.
//!
//! Builds a `Snapshot` from a directory of exported collection files:
//! - Parse all five collections
//! - Index the restaurant catalog
//! - Validate document values

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::path::Path;
use tracing::info;

impl Snapshot {
    /// Load a full database snapshot from a directory of JSON exports.
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse all five collection files (in parallel)
    /// 2. Index the catalog
    /// 3. Validate document values
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading snapshot from {:?}", data_dir);

        let orders_path = data_dir.join("orders.json");
        let reviews_path = data_dir.join("reviews.json");
        let views_path = data_dir.join("viewlogs.json");
        let searches_path = data_dir.join("searchlogs.json");
        let restaurants_path = data_dir.join("restaurants.json");

        // Parse all five files in parallel using Rayon.
        // Nested joins give five-way parallelism over independent files.
        let ((orders, reviews), ((views, searches), restaurants)) = rayon::join(
            || {
                rayon::join(
                    || crate::parser::parse_orders(&orders_path),
                    || crate::parser::parse_reviews(&reviews_path),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || crate::parser::parse_views(&views_path),
                            || crate::parser::parse_searches(&searches_path),
                        )
                    },
                    || crate::parser::parse_restaurants(&restaurants_path),
                )
            },
        );

        let orders = orders?;
        let reviews = reviews?;
        let views = views?;
        let searches = searches?;
        let restaurants = restaurants?;

        let mut catalog = Catalog::new();
        for restaurant in restaurants {
            catalog.insert(restaurant)?;
        }

        let snapshot = Snapshot {
            orders,
            reviews,
            views,
            searches,
            catalog,
        };

        snapshot.validate()?;

        let (orders, reviews, views, searches, restaurants) = snapshot.counts();
        info!(
            orders,
            reviews, views, searches, restaurants, "Snapshot loaded and validated"
        );

        Ok(snapshot)
    }

    /// Validate document values across the snapshot.
    ///
    /// Check that:
    /// - Order and review ratings, where present, fall in 0.0 - 5.0
    /// - Catalog ratings fall in 0.0 - 5.0
    ///
    /// Interaction logs are allowed to reference restaurants that have since
    /// left the catalog; only the rank path resolves metadata, and it
    /// surfaces misses at query time.
    pub fn validate(&self) -> Result<()> {
        for order in &self.orders {
            if let Some(rating) = order.rating {
                check_rating("order rating", rating)?;
            }
        }
        for review in &self.reviews {
            if let Some(rating) = review.rating {
                check_rating("review rating", rating)?;
            }
        }
        for restaurant in self.catalog.iter() {
            check_rating("catalog rating", restaurant.rating)?;
        }
        Ok(())
    }
}

fn check_rating(field: &str, rating: f32) -> Result<()> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(DataLoadError::InvalidValue {
            field: field.to_string(),
            value: rating.to_string(),
        });
    }
    Ok(())
}
