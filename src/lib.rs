//! Word-Ripple: a bounded, parallel word-frequency crawler
//!
//! This crate crawls outward from a set of starting pages, following links up
//! to a configured depth and until a deadline passes, and tallies how often
//! each word appears across every distinct page it fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Word-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot create a worker pool of size {requested}")]
    ResourceExhaustion { requested: usize },

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while fetching or parsing a single page
///
/// These never abort a crawl; the branch that hit one simply ends.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read {url}: {source}")]
    File { url: String, source: std::io::Error },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl { url: String, source: ::url::ParseError },
}

/// Result type alias for Word-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single-page operations
pub type PageResult<T> = std::result::Result<T, PageError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlRequest, CrawlScheduler, HttpPageParser, PageContent, PageParser};
pub use output::{CrawlResult, CrawlResultWriter};
pub use state::{BranchOutcome, VisitedSet, WordCountAccumulator};
