//! Recipe-Harvest: a single-site recipe scraper
//!
//! This crate discovers recipe pages on one website, extracts a fixed set of
//! fields from each page, persists them as documents keyed by URL, and computes
//! aggregate statistics over the stored records.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Recipe-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Main category '{0}' not found on the categories page")]
    CategoryNotFound(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for {field}: {message}")]
    InvalidSelector { field: String, message: String },
}

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("URL disallowed by robots.txt: {url}")]
    Disallowed { url: String },
}

impl FetchError {
    /// Returns true for failures that may succeed on another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Body { .. } | Self::Disallowed { .. } => false,
        }
    }

    /// The URL the failed request targeted
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::Disallowed { url } => url,
        }
    }
}

/// Errors raised while extracting structured data from a page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Required field '{field}' not found")]
    MissingField { field: &'static str },

    #[error("Expected element '{element}' not found")]
    MissingElement { element: &'static str },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Recipe-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{CategoryRef, Recipe};
pub use storage::{RecipeStore, SqliteStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_retryable() {
        let url = "https://example.com/".to_string();
        assert!(FetchError::Timeout { url: url.clone() }.is_retryable());
        assert!(FetchError::Status { url: url.clone(), status: 503 }.is_retryable());
        assert!(FetchError::Status { url: url.clone(), status: 429 }.is_retryable());
        assert!(!FetchError::Status { url: url.clone(), status: 404 }.is_retryable());
        assert!(!FetchError::Disallowed { url }.is_retryable());
    }

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: 500,
        };
        assert_eq!(err.url(), "https://example.com/a");
    }
}
