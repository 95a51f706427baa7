//! Place lookup error types

use thiserror::Error;

/// Errors from the geocoding and image lookup services
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    ApiError { service: &'static str, status: u16 },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}
