//! Error types for hianime scraper
//!
//! Errors stay inside the resolution pipeline. The public query surface
//! turns every one of them into an empty result, but the `try_*` methods
//! expose them so callers can see why a step failed.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all hianime scraper operations
///
/// Implements Display for human-readable messages and Serialize
/// for Tauri command compatibility.
#[derive(Error, Debug)]
pub enum HianimeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// Page or endpoint does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// AJAX endpoint returned malformed JSON
    #[error("Invalid JSON payload: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Expected structure was missing from a page
    #[error("Failed to parse page: {0}")]
    ParseError(String),

    /// Embed page contained no playable URL
    #[error("No playable video URL in embed page: {0}")]
    NoVideoUrl(String),

    /// Empty or whitespace-only search query
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Invalid anime or episode id
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// Invalid URL or client configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Serialize for HianimeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for hianime operations
pub type Result<T> = std::result::Result<T, HianimeError>;
