//! Parsers for the exported collection files.
//!
//! Each collection is one JSON file holding an array of documents, the way
//! `mongoexport --jsonArray` writes them:
//! - orders.json:      [{ "_id", "userId", "restaurantId", "rating"?, ... }]
//! - reviews.json:     [{ "_id", "userId", "restaurantId", "rating"?, "content"?, ... }]
//! - viewlogs.json:    [{ "_id", "userId", "restaurantId" }]
//! - searchlogs.json:  [{ "_id", "userId"?, "keyword"? }]
//! - restaurants.json: [{ "_id", "name", "address", "rating" }]
//!
//! Unknown fields are ignored so the export can carry the full documents.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode one collection file into a Vec of documents.
///
/// A missing file is reported as `FileNotFound` with the path; a file that
/// exists but doesn't decode is a `DecodeError` carrying the file name.
fn parse_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| DataLoadError::DecodeError {
        file: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        source: e,
    })
}

/// Parse the orders.json export
pub fn parse_orders(path: &Path) -> Result<Vec<Order>> {
    parse_collection(path)
}

/// Parse the reviews.json export
pub fn parse_reviews(path: &Path) -> Result<Vec<Review>> {
    parse_collection(path)
}

/// Parse the viewlogs.json export
pub fn parse_views(path: &Path) -> Result<Vec<ViewLog>> {
    parse_collection(path)
}

/// Parse the searchlogs.json export
pub fn parse_searches(path: &Path) -> Result<Vec<SearchLog>> {
    parse_collection(path)
}

/// Parse the restaurants.json export
pub fn parse_restaurants(path: &Path) -> Result<Vec<Restaurant>> {
    parse_collection(path)
}
