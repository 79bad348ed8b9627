//! Output module for presenting crawl results
//!
//! This module handles:
//! - The `CrawlResult` value and its JSON shape
//! - Appending results to a JSON document file
//! - Printing a human-readable crawl summary

mod json_writer;
mod result;
mod summary;

pub use json_writer::CrawlResultWriter;
pub use result::CrawlResult;
pub use summary::{format_summary, print_summary};
