//! Catalog API error types.

use thiserror::Error;

/// Errors that can occur when talking to the remote book-catalog API.
///
/// These are external failures; the session core never interprets or retries
/// them, they propagate to the UI layer unmodified.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested book does not exist.
    #[error("book not found")]
    NotFound,

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}
