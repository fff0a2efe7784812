//! Error types for fetching and configuration
//!
//! Extraction itself never fails: a missing element becomes the field's
//! fallback value. Only the network and config layers produce errors.

use thiserror::Error;

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for crate operations
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP request failed with status {status}: {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// URL could not be built or parsed
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Config file could not be read
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `SiteConfig`
    #[error("Config decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config values are unusable
    #[error("Invalid config: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure was the request deadline expiring
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}
