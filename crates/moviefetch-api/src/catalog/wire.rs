//! JSON payload shapes for the catalog endpoints.
//!
//! Every field is required; `serde` rejects missing or mistyped fields so a
//! malformed payload never yields a partial result.

use serde::{Deserialize, Serialize};

/// Root of the category listing payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CategoryListResponse {
    /// Categories in display order.
    pub category: Vec<CategoryItem>,
}

/// A category inside the listing payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CategoryItem {
    pub title: String,
    pub movie: Vec<MovieItem>,
}

/// A movie reference (`id` + `cover_url`).
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MovieItem {
    pub id: u64,
    pub cover_url: String,
}

/// Root of the movie detail payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MovieDetailResponse {
    pub id: u64,
    pub title: String,
    pub desc: String,
    pub cast: String,
    pub cover_url: String,
    /// Similar movies.
    pub movie: Vec<MovieItem>,
}

/// Error body returned with HTTP 400.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}
