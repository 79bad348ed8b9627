//! Page fetcher implementation
//!
//! This module handles all page retrieval for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for `http` and `https` pages
//! - Reading `file` URLs from local disk
//! - Classifying failures into `PageError`s

use crate::config::{compile_patterns, Config, FullMatchPattern, UserAgentConfig};
use crate::crawler::parser::{parse_html, PageContent, PageParser};
use crate::{PageError, PageResult};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Content types accepted as HTML
const HTML_CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use word_ripple::config::UserAgentConfig;
/// use word_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "WordRipple".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Fetches the raw body of a page
///
/// # Request Flow
///
/// | Scheme | Action |
/// |--------|--------|
/// | `http`, `https` | GET; non-2xx → `Status`, non-HTML → `ContentMismatch` |
/// | `file` | Read from disk; failure → `File` |
/// | anything else | `UnsupportedScheme` |
///
/// Redirects are not followed; a 3xx is reported as a `Status` error.
pub async fn fetch_page(client: &Client, url: &Url) -> PageResult<String> {
    match url.scheme() {
        "http" | "https" => fetch_http(client, url).await,
        "file" => fetch_file(url).await,
        other => Err(PageError::UnsupportedScheme(other.to_string())),
    }
}

async fn fetch_http(client: &Client, url: &Url) -> PageResult<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| PageError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    // A missing Content-Type is given the benefit of the doubt
    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        let is_html = HTML_CONTENT_TYPES
            .iter()
            .any(|accepted| content_type.contains(accepted));
        if !is_html {
            return Err(PageError::ContentMismatch {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    response.text().await.map_err(|source| PageError::Http {
        url: url.to_string(),
        source,
    })
}

async fn fetch_file(url: &Url) -> PageResult<String> {
    let path = url.to_file_path().map_err(|_| PageError::File {
        url: url.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local path"),
    })?;

    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| PageError::File {
            url: url.to_string(),
            source,
        })
}

/// `PageParser` backed by real HTTP requests and local files
#[derive(Debug, Clone)]
pub struct HttpPageParser {
    client: Client,
    ignored_words: Vec<FullMatchPattern>,
}

impl HttpPageParser {
    /// Creates a parser with its own HTTP client
    pub fn new(
        user_agent: &UserAgentConfig,
        ignored_words: Vec<FullMatchPattern>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(user_agent)?, ignored_words))
    }

    /// Creates a parser around an existing client
    pub fn with_client(client: Client, ignored_words: Vec<FullMatchPattern>) -> Self {
        Self {
            client,
            ignored_words,
        }
    }

    /// Builds a parser from the user-agent and ignored-words settings
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let ignored_words = compile_patterns(&config.ignored_words)?;
        Ok(Self::new(&config.user_agent, ignored_words)?)
    }
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> PageResult<PageContent> {
        let parsed_url = Url::parse(url).map_err(|source| PageError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let body = fetch_page(&self.client, &parsed_url).await?;
        let page = parse_html(&body, &parsed_url, &self.ignored_words);

        tracing::trace!(
            "Parsed {}: {} words, {} links",
            url,
            page.word_counts.len(),
            page.links.len()
        );

        Ok(page)
    }
}
