//! Error types for forum scraping operations.
//!
//! This module defines the main error type [`BbsError`] which represents
//! every failure that can occur while fetching a forum page, parsing it,
//! or loading site configuration.
//!
//! A selector that matches nothing is never an error: extraction degrades
//! to empty fields instead.
//!
//! # Example
//!
//! ```rust
//! use bandbbs_core::{BbsError, Result};
//!
//! fn require_markup(html: &str) -> Result<&str> {
//!     if html.is_empty() {
//!         return Err(BbsError::HtmlParseError("empty document".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetch and extraction operations.
///
/// When a screen publishes a failure, this error is collapsed into its
/// `Display` string, so messages are written to be shown verbatim.
#[derive(Error, Debug)]
pub enum BbsError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, refused connections,
    /// and other transport-level problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or a page path cannot be joined
    /// onto the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, in practice always an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Site configuration errors.
    ///
    /// Returned when a directive file cannot be read or contains a line that
    /// is not a known `key: value` directive.
    #[error("Site configuration error: {0}")]
    SiteConfigError(String),

    /// JSON serialization of records failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for BbsError.
pub type Result<T> = std::result::Result<T, BbsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BbsError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_http_status_error() {
        let err = BbsError::HttpStatus { status: 503, url: "https://www.bandbbs.cn/".to_string() };
        assert_eq!(err.to_string(), "HTTP 503 for https://www.bandbbs.cn/");
    }

    #[test]
    fn test_timeout_error() {
        let err = BbsError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }
}
