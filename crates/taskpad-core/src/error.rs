//! Error types for taskpad-core

use thiserror::Error;

/// Result type alias using taskpad-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in taskpad-core operations
///
/// Form validation failures are deliberately not represented here; see
/// [`crate::form::FieldErrors`], which never crosses the cache boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote store rejected or failed the request
    #[error("Remote store error: {0}")]
    Remote(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON payload
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Todo not found in the remote store
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// Invalid adapter configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}
