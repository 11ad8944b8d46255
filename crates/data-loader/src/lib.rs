//! # Data Loader Crate
//!
//! This crate handles loading and indexing one export of the booking
//! platform's document database.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Order, Review, ViewLog, Restaurant, Snapshot)
//! - **parser**: Decode JSON collection exports into Rust structs
//! - **index**: Load a full snapshot and validate it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Snapshot;
//! use std::path::Path;
//!
//! // Load the entire snapshot
//! let snapshot = Snapshot::load_from_dir(Path::new("data/snapshot"))?;
//!
//! // Query data
//! let restaurant = snapshot.catalog.get("64f1c2...").unwrap();
//! println!("{} has {} orders", restaurant.name, snapshot.orders.len());
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    RestaurantId,
    // Core types
    Order,
    Review,
    ViewLog,
    SearchLog,
    Restaurant,
    Catalog,
    Snapshot,
};
