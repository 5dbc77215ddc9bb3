//! Error types for replytree operations.
//!
//! This module defines [`FetchError`], the single failure type surfaced by
//! the engine. It covers transport problems, unexpected HTTP responses, and
//! documents that cannot be queried at all.
//!
//! Missing fields inside an otherwise readable page are *not* errors: the
//! extractor degrades them to empty strings or defaults.
//!
//! # Example
//!
//! ```rust
//! use replytree_core::{FetchError, Result};
//!
//! fn require_html(body: &str) -> Result<&str> {
//!     if body.is_empty() {
//!         return Err(FetchError::HtmlParseError("empty body".to_string()));
//!     }
//!     Ok(body)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching and extraction.
///
/// Every variant is a hard failure for one fetch/extract cycle. There is no
/// retry policy; callers decide what to do with it.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport errors from reqwest.
    ///
    /// Wraps DNS failures, refused connections, TLS problems and body read errors.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} returned for {url}")]
    HttpStatus { status: u16, url: String },

    /// The response body is not an HTML document.
    #[error("Expected an HTML document, got content type {content_type}")]
    NotHtml { content_type: String },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or does not use http/https.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Document-level parse failures.
    ///
    /// Raised for invalid CSS selectors in a rule table, since a broken
    /// selector makes every document unreadable.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading input or writing output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Rule file errors.
    ///
    /// Returned when a rule file cannot be read, decoded, or validated.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization errors from the formatters.
    #[error("Failed to serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for FetchError.
pub type Result<T> = std::result::Result<T, FetchError>;
