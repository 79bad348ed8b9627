use crate::config::{compile_patterns, Config, FullMatchPattern};
use crate::ConfigError;
use std::time::Duration;

/// Everything one crawl invocation needs, fixed for its whole duration
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Pages to start from, in order
    pub start_pages: Vec<String>,

    /// Link depth budget of each start page (0 crawls nothing)
    pub max_depth: u32,

    /// Wall-clock budget; the deadline is derived from it when the crawl starts
    pub timeout: Duration,

    /// Full-match patterns of URLs that are never fetched
    pub ignored_urls: Vec<FullMatchPattern>,

    /// How many of the most popular words to keep in the result
    pub popular_word_count: usize,

    /// Requested worker count, capped at hardware parallelism by the pool
    pub parallelism: usize,
}

impl CrawlRequest {
    /// Builds a request from a loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlRequest)` - Request ready to hand to the scheduler
    /// * `Err(ConfigError)` - Zero parallelism or a malformed ignore pattern
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.crawler.parallelism < 1 {
            return Err(ConfigError::Validation(format!(
                "parallelism must be >= 1, got {}",
                config.crawler.parallelism
            )));
        }

        Ok(Self {
            start_pages: config.start_pages.clone(),
            max_depth: config.crawler.max_depth,
            timeout: Duration::from_secs(config.crawler.timeout_seconds),
            ignored_urls: compile_patterns(&config.ignored_urls)?,
            popular_word_count: config.crawler.popular_word_count,
            parallelism: config.crawler.parallelism,
        })
    }
}
