//! Crawler module for the parallel crawl itself
//!
//! This module contains the core crawling logic, including:
//! - Page fetching and HTML parsing (the `PageParser` capability)
//! - Per-branch policy checks (depth, deadline, ignored URLs)
//! - The recursive fan-out/join crawl task
//! - The worker pool and crawl scheduler
//! - Reduction of word totals to the most popular words

mod fetcher;
mod parser;
pub mod policy;
mod reducer;
mod request;
mod scheduler;
mod task;

pub use fetcher::{build_http_client, fetch_page, user_agent_string, HttpPageParser};
pub use parser::{parse_html, PageContent, PageParser};
pub use reducer::reduce;
pub use request::CrawlRequest;
pub use scheduler::{hardware_parallelism, CrawlReport, CrawlScheduler, WorkerPool};

use crate::config::Config;
use crate::output::CrawlResult;
use crate::RippleError;
use std::sync::Arc;

/// Runs a complete crawl from a loaded configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the `CrawlRequest`
/// 2. Build the HTTP page parser
/// 3. Crawl every start page to completion
/// 4. Reduce the word totals to the most popular words
pub async fn crawl(config: &Config) -> Result<CrawlResult, RippleError> {
    let request = CrawlRequest::from_config(config)?;
    let parser = HttpPageParser::from_config(config)?;
    CrawlScheduler::new(Arc::new(parser)).crawl(&request).await
}
