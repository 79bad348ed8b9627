//! HTML parser for extracting links and words
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from <a> tags and canonical links)
//! - Per-page word counts from the visible body text
//!
//! It also defines the `PageParser` capability the crawl tasks consume.

use crate::config::FullMatchPattern;
use crate::PageResult;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Elements whose text never counts as page words
const NON_CONTENT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Words and outbound links of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Occurrences of each word on the page
    pub word_counts: HashMap<String, u64>,

    /// Absolute URLs linked from the page, in document order
    pub links: Vec<String>,
}

/// Fetches a page and reduces it to words and links
///
/// Implementations are shared by every crawl task, so they must be safe to
/// call concurrently.
#[async_trait]
pub trait PageParser: Send + Sync {
    /// Fetches and parses `url`
    ///
    /// # Returns
    ///
    /// * `Ok(PageContent)` - Words and links found on the page
    /// * `Err(PageError)` - The page was unreachable or unusable
    async fn parse(&self, url: &str) -> PageResult<PageContent>;
}

/// Parses HTML content and extracts its links and words
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only links
///
/// # Word Extraction Rules
///
/// Text under `<body>` (or the whole document when there is none) is split on
/// every non-alphanumeric character and lower-cased. Text inside `script`,
/// `style`, `noscript` and `template` is skipped, as is any word that fully
/// matches one of `ignored_words`.
///
/// # Example
///
/// ```
/// use word_ripple::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Ignored</title></head><body>Hello <a href="/page">hello</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, &[]);
/// assert!(!parsed.word_counts.contains_key("ignored"));
/// assert_eq!(parsed.word_counts["hello"], 2);
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, ignored_words: &[FullMatchPattern]) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        links: extract_links(&document, base_url),
        word_counts: extract_words(&document, ignored_words),
    }
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(absolute_url);
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Counts the words of the document's visible text
fn extract_words(document: &Html, ignored_words: &[FullMatchPattern]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_CONTENT_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            if raw.is_empty() {
                continue;
            }

            let word = raw.to_lowercase();
            if ignored_words.iter().any(|pattern| pattern.is_match(&word)) {
                continue;
            }

            *counts.entry(word).or_insert(0) += 1;
        }
    }

    counts
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Anything other than http, https, or file after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if !matches!(absolute_url.scheme(), "http" | "https" | "file") {
        return None;
    }

    // Same page, different anchor
    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}
