//! Error types for Gleaner operations.
//!
//! This module defines the main error type [`GleanError`] which represents
//! every way a scrape can be aborted. Extraction itself never fails: a page
//! that lacks a title, an author or any recognizable content still produces
//! an article with those fields absent.
//!
//! # Example
//!
//! ```rust
//! use gleaner_core::{GleanError, Result};
//!
//! fn require_url(url: &str) -> Result<&str> {
//!     if url.trim().is_empty() {
//!         return Err(GleanError::InvalidInput("URL is required".to_string()));
//!     }
//!     Ok(url)
//! }
//! # assert!(require_url("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scraping operations.
///
/// # Example
///
/// ```rust
/// use gleaner_core::{ErrorClass, GleanError};
///
/// let err = GleanError::FetchFailed { reason: "404 Not Found".to_string() };
/// assert_eq!(err.class(), ErrorClass::Upstream);
/// assert!(err.is_retryable());
/// ```
#[derive(Error, Debug)]
pub enum GleanError {
    /// The caller supplied a missing, empty or unusable URL.
    ///
    /// Not retryable: the same input will always fail.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The target page could not be retrieved.
    ///
    /// Covers non-2xx responses, DNS and connection failures, timeouts and
    /// failures while reading the response body. `reason` carries the
    /// upstream status text when one is available.
    #[error("Failed to fetch URL: {reason}")]
    FetchFailed { reason: String },

    /// File not found.
    ///
    /// Returned when reading HTML from a local file that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File or stream I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An article could not be rendered to an output format.
    #[error("Failed to serialize article: {0}")]
    Serialization(String),
}

/// Coarse classification of a [`GleanError`].
///
/// Transport layers map this to their own status codes; the core never
/// decides on concrete numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself was wrong.
    BadInput,
    /// The page being scraped misbehaved or could not be reached.
    Upstream,
    /// Something failed on our side.
    Internal,
}

impl GleanError {
    /// Classifies the error as bad input, upstream failure or internal failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            GleanError::InvalidInput(_) | GleanError::FileNotFound(_) => ErrorClass::BadInput,
            GleanError::FetchFailed { .. } => ErrorClass::Upstream,
            GleanError::Io(_) | GleanError::Serialization(_) => ErrorClass::Internal,
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Only upstream fetch failures qualify. Retrying is left to callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GleanError::FetchFailed { .. })
    }
}

impl From<serde_json::Error> for GleanError {
    fn from(err: serde_json::Error) -> Self {
        GleanError::Serialization(err.to_string())
    }
}

/// Result type alias for GleanError.
pub type Result<T> = std::result::Result<T, GleanError>;
