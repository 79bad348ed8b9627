//! State module for tracking crawl progress
//!
//! This module provides the shared, concurrency-safe state that every crawl
//! branch of one crawl mutates.
//!
//! # Components
//!
//! - `VisitedSet`: Atomic claim-set so each URL is fetched at most once
//! - `WordCountAccumulator`: Atomic merge-map of running word totals
//! - `BranchOutcome` / `CrawlStats`: How each branch ended, counted lock-free

mod outcome;
mod stats;
mod visited;
mod word_counts;

// Re-export main types
pub use outcome::BranchOutcome;
pub use stats::{CrawlStatistics, CrawlStats};
pub use visited::VisitedSet;
pub use word_counts::WordCountAccumulator;
