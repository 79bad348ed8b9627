use serde::Deserialize;

/// Main configuration structure for Word-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pages the crawl starts from, in order
    #[serde(rename = "start-pages", default)]
    pub start_pages: Vec<String>,

    /// Regular expressions; a URL fully matching any of them is never fetched
    #[serde(rename = "ignored-urls", default)]
    pub ignored_urls: Vec<String>,

    /// Regular expressions; a word fully matching any of them is not counted
    #[serde(rename = "ignored-words", default)]
    pub ignored_words: Vec<String>,

    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth to crawl from each start page
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Wall-clock budget for the whole crawl, in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Number of most popular words to report
    #[serde(rename = "popular-word-count")]
    pub popular_word_count: usize,

    /// Requested number of concurrent workers (capped at hardware parallelism)
    pub parallelism: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File the crawl result is appended to; stdout when absent
    #[serde(rename = "result-path")]
    pub result_path: Option<String>,
}
