//! Integration tests for the crawler
//!
//! Most tests crawl an in-memory link graph through a counting `PageParser`
//! so fetch counts can be asserted exactly. The last few use wiremock and
//! local files to test the full `HttpPageParser` path end-to-end.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use word_ripple::config::{compile_patterns, FullMatchPattern, UserAgentConfig};
use word_ripple::crawler::{CrawlRequest, CrawlScheduler, HttpPageParser};
use word_ripple::{BranchOutcome, PageContent, PageError, PageParser, RippleError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory link graph that records how often each URL is parsed
#[derive(Default)]
struct GraphParser {
    pages: HashMap<String, PageContent>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl GraphParser {
    fn new() -> Self {
        Self::default()
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn page(mut self, url: &str, words: &[(&str, u64)], links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            PageContent {
                word_counts: words.iter().map(|(w, c)| (w.to_string(), *c)).collect(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageParser for GraphParser {
    async fn parse(&self, url: &str) -> Result<PageContent, PageError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            // Vary the delay per URL so sibling branches interleave differently
            let jitter = url.len() as u64 % 5;
            tokio::time::sleep(self.delay + Duration::from_millis(jitter)).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages.get(url).cloned().ok_or_else(|| PageError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn request(start_pages: &[&str], max_depth: u32) -> CrawlRequest {
    CrawlRequest {
        start_pages: start_pages.iter().map(|s| s.to_string()).collect(),
        max_depth,
        timeout: Duration::from_secs(30),
        ignored_urls: vec![],
        popular_word_count: 100,
        parallelism: 4,
    }
}

fn scheduler(parser: &Arc<GraphParser>) -> CrawlScheduler {
    CrawlScheduler::new(Arc::clone(parser) as Arc<dyn PageParser>)
}

#[tokio::test]
async fn test_shared_link_is_fetched_once() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("alpha", 1)], &["b"])
            .page("c", &[("gamma", 1)], &["b"])
            .page("b", &[("beta", 1)], &[]),
    );

    let result = scheduler(&parser)
        .crawl(&request(&["a", "c"], 3))
        .await
        .unwrap();

    assert_eq!(parser.calls("b"), 1);
    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.get("beta"), Some(1));
}

#[tokio::test]
async fn test_depth_bound() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("a", 1)], &["b"])
            .page("b", &[("b", 1)], &["c"])
            .page("c", &[("c", 1)], &["d"])
            .page("d", &[("d", 1)], &[]),
    );

    let result = scheduler(&parser).crawl(&request(&["a"], 2)).await.unwrap();

    assert_eq!(parser.calls("a"), 1);
    assert_eq!(parser.calls("b"), 1);
    assert_eq!(parser.calls("c"), 0);
    assert_eq!(parser.calls("d"), 0);
    assert_eq!(result.urls_visited, 2);
    assert_eq!(result.get("d"), None);
}

#[tokio::test]
async fn test_zero_depth_crawls_nothing() {
    let parser = Arc::new(GraphParser::new().page("a", &[("a", 1)], &[]));

    let report = scheduler(&parser)
        .crawl_detailed(&request(&["a"], 0))
        .await
        .unwrap();

    assert_eq!(parser.total_calls(), 0);
    assert_eq!(report.result.urls_visited, 0);
    assert_eq!(report.stats.count(BranchOutcome::DepthExhausted), 1);
}

#[tokio::test]
async fn test_passed_deadline_fetches_nothing() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("alpha", 2)], &["b"])
            .page("b", &[("beta", 1)], &[]),
    );

    let mut req = request(&["a", "b"], 5);
    req.timeout = Duration::ZERO;

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert_eq!(parser.total_calls(), 0);
    assert_eq!(report.result.urls_visited, 0);
    assert!(report.result.word_counts.is_empty());
    assert_eq!(report.stats.count(BranchOutcome::DeadlinePassed), 2);
}

#[tokio::test]
async fn test_deadline_stops_new_fetches_mid_crawl() {
    // Each page takes longer than the whole budget, so only the start page
    // gets fetched; its children find the deadline already passed
    let parser = Arc::new(
        GraphParser::new()
            .with_delay(Duration::from_millis(200))
            .page("a", &[("alpha", 1)], &["b", "c"])
            .page("b", &[("beta", 1)], &[])
            .page("c", &[("gamma", 1)], &[]),
    );

    let mut req = request(&["a"], 5);
    req.timeout = Duration::from_millis(50);

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert_eq!(parser.calls("a"), 1);
    assert_eq!(parser.calls("b"), 0);
    assert_eq!(parser.calls("c"), 0);
    assert_eq!(report.result.urls_visited, 1);
    assert_eq!(report.result.get("alpha"), Some(1));
    assert_eq!(report.stats.count(BranchOutcome::DeadlinePassed), 2);
}

#[tokio::test]
async fn test_branch_queued_past_deadline_is_not_fetched() {
    // One slot: whichever start page gets it holds it past the deadline, so
    // the other passes the first deadline check but not the one after queuing
    let parser = Arc::new(
        GraphParser::new()
            .with_delay(Duration::from_millis(200))
            .page("a", &[("alpha", 1)], &[])
            .page("b", &[("beta", 1)], &[]),
    );

    let mut req = request(&["a", "b"], 5);
    req.timeout = Duration::from_millis(50);
    req.parallelism = 1;

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert_eq!(report.pool_size, 1);
    assert_eq!(parser.total_calls(), 1);
    assert_eq!(report.result.urls_visited, 1);
    assert_eq!(report.result.word_counts.len(), 1);
    assert_eq!(report.stats.count(BranchOutcome::Processed), 1);
    assert_eq!(report.stats.count(BranchOutcome::DeadlinePassed), 1);
}

#[tokio::test]
async fn test_ignored_start_page_is_excluded() {
    let parser = Arc::new(
        GraphParser::new()
            .page("https://site.test/keep", &[("kept", 2)], &[])
            .page("https://site.test/private/skip", &[("secret", 9)], &[]),
    );

    let mut req = request(
        &["https://site.test/keep", "https://site.test/private/skip"],
        2,
    );
    req.ignored_urls = compile_patterns(&["https://site\\.test/private/.*".to_string()]).unwrap();

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert_eq!(parser.calls("https://site.test/private/skip"), 0);
    assert_eq!(report.result.urls_visited, 1);
    assert_eq!(report.result.get("kept"), Some(2));
    assert_eq!(report.result.get("secret"), None);
    assert_eq!(report.stats.count(BranchOutcome::Ignored), 1);
}

#[tokio::test]
async fn test_ignore_pattern_must_match_whole_url() {
    let parser = Arc::new(
        GraphParser::new().page("https://site.test/private/skip/more", &[("deep", 1)], &[]),
    );

    let mut req = request(&["https://site.test/private/skip/more"], 2);
    req.ignored_urls = vec![FullMatchPattern::new("https://site\\.test/private").unwrap()];

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert_eq!(parser.calls("https://site.test/private/skip/more"), 1);
    assert_eq!(report.result.urls_visited, 1);
    assert_eq!(report.result.get("deep"), Some(1));
    assert_eq!(report.stats.count(BranchOutcome::Ignored), 0);
}

#[tokio::test]
async fn test_word_counts_sum_across_pages() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("x", 3), ("y", 1)], &["b"])
            .page("b", &[("x", 5)], &[]),
    );

    let result = scheduler(&parser).crawl(&request(&["a"], 2)).await.unwrap();

    assert_eq!(result.get("x"), Some(8));
    assert_eq!(result.get("y"), Some(1));
    assert_eq!(result.urls_visited, 2);
}

#[tokio::test]
async fn test_popular_words_ranking() {
    let parser = Arc::new(
        GraphParser::new()
            .page("p1", &[("a", 2), ("bb", 5), ("cc", 1)], &["p2"])
            .page("p2", &[("a", 3), ("cc", 2)], &[]),
    );

    let mut req = request(&["p1"], 2);
    req.popular_word_count = 2;

    let result = scheduler(&parser).crawl(&req).await.unwrap();

    let ranked: Vec<(&str, u64)> = result
        .word_counts
        .iter()
        .map(|(w, c)| (w.as_str(), *c))
        .collect();
    assert_eq!(ranked, vec![("bb", 5), ("a", 5)]);
}

#[tokio::test]
async fn test_empty_start_pages() {
    let parser = Arc::new(GraphParser::new().page("a", &[("a", 1)], &[]));

    let result = scheduler(&parser).crawl(&request(&[], 3)).await.unwrap();

    assert_eq!(parser.total_calls(), 0);
    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
}

#[tokio::test]
async fn test_zero_parallelism_fails_before_crawling() {
    let parser = Arc::new(GraphParser::new().page("a", &[("a", 1)], &[]));

    let mut req = request(&["a"], 3);
    req.parallelism = 0;

    let result = scheduler(&parser).crawl(&req).await;

    assert!(matches!(
        result,
        Err(RippleError::ResourceExhaustion { requested: 0 })
    ));
    assert_eq!(parser.total_calls(), 0);
}

#[tokio::test]
async fn test_failed_page_does_not_abort_crawl() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("alpha", 1)], &["missing", "b"])
            .page("b", &[("beta", 1)], &[]),
    );

    let report = scheduler(&parser)
        .crawl_detailed(&request(&["a"], 3))
        .await
        .unwrap();

    assert_eq!(parser.calls("missing"), 1);
    assert_eq!(report.result.get("alpha"), Some(1));
    assert_eq!(report.result.get("beta"), Some(1));
    assert_eq!(report.stats.count(BranchOutcome::FetchFailed), 1);
    assert_eq!(report.stats.count(BranchOutcome::Processed), 2);
}

#[tokio::test]
async fn test_cycles_terminate() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("ping", 1)], &["b", "a"])
            .page("b", &[("pong", 1)], &["a"]),
    );

    let result = scheduler(&parser).crawl(&request(&["a"], 50)).await.unwrap();

    assert_eq!(parser.calls("a"), 1);
    assert_eq!(parser.calls("b"), 1);
    assert_eq!(result.urls_visited, 2);
}

/// Every node links to the next few nodes, so most pages are reachable
/// along several concurrent paths
fn dense_graph(nodes: usize, delay: Duration) -> GraphParser {
    let mut parser = GraphParser::new().with_delay(delay);
    for i in 0..nodes {
        let url = format!("n{}", i);
        let links: Vec<String> = (1..=4).map(|step| format!("n{}", (i * 3 + step) % nodes)).collect();
        let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
        let word = format!("w{}", i % 7);
        parser = parser.page(&url, &[("common", 1), (word.as_str(), i as u64 + 1)], &link_refs);
    }
    parser
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_crawls_are_identical() {
    let mut previous = None;

    for _ in 0..10 {
        let parser = Arc::new(dense_graph(40, Duration::from_millis(1)));
        // Deep enough that which path claims a page first cannot change
        // what is reachable
        let mut req = request(&["n0", "n5", "n17"], 50);
        req.popular_word_count = 5;

        let result = scheduler(&parser).crawl(&req).await.unwrap();

        for i in 0..40 {
            assert!(parser.calls(&format!("n{}", i)) <= 1, "n{} fetched twice", i);
        }
        assert_eq!(parser.total_calls(), result.urls_visited);

        if let Some(previous) = &previous {
            assert_eq!(&result, previous);
        }
        previous = Some(result);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetches_never_exceed_pool_size() {
    let parser = Arc::new(dense_graph(30, Duration::from_millis(5)));

    let mut req = request(&["n0", "n1", "n2", "n3"], 5);
    req.parallelism = 2;

    let report = scheduler(&parser).crawl_detailed(&req).await.unwrap();

    assert!(report.pool_size <= 2);
    assert!(parser.max_in_flight.load(Ordering::SeqCst) <= report.pool_size);
    assert!(report.result.urls_visited > 0);
}

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>T</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"rust crawler rust <a href="{0}/page1">one</a> <a href="/page2">two</a> <a href="/broken">x</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(r#"rust pages <a href="/">home</a> <a href="/page2">two</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("crawler pages of text"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ignored_words = compile_patterns(&["of".to_string()]).unwrap();
    let parser = HttpPageParser::new(&user_agent(), ignored_words).unwrap();
    let scheduler = CrawlScheduler::new(Arc::new(parser));

    let start = format!("{}/", base_url);
    let mut req = request(&[start.as_str()], 3);
    req.popular_word_count = 3;

    let report = scheduler.crawl_detailed(&req).await.unwrap();

    // "/", "/page1", "/page2" and the failing "/broken" were all claimed
    assert_eq!(report.result.urls_visited, 4);
    assert_eq!(report.stats.count(BranchOutcome::FetchFailed), 1);

    let ranked: Vec<(&str, u64)> = report
        .result
        .word_counts
        .iter()
        .map(|(w, c)| (w.as_str(), *c))
        .collect();
    assert_eq!(ranked, vec![("rust", 3), ("crawler", 2), ("pages", 2)]);
    assert_eq!(report.result.get("of"), None);
}

#[tokio::test]
async fn test_non_html_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"start <a href="/data.json">data</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"word": 1}"#, "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = format!("{}/", base_url);
    let parser = HttpPageParser::new(&user_agent(), vec![]).unwrap();
    let report = CrawlScheduler::new(Arc::new(parser))
        .crawl_detailed(&request(&[start.as_str()], 2))
        .await
        .unwrap();

    assert_eq!(report.result.get("start"), Some(1));
    assert_eq!(report.result.get("word"), None);
    assert_eq!(report.stats.count(BranchOutcome::FetchFailed), 1);
}

#[tokio::test]
async fn test_full_crawl_over_local_files() {
    let dir = tempfile::TempDir::new().unwrap();

    let write_page = |name: &str, body: &str| {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        write!(file, "<html><body>{}</body></html>", body).unwrap();
    };
    write_page("index.html", r#"local words <a href="second.html">next</a>"#);
    write_page("second.html", r#"more local words <a href="index.html">back</a>"#);

    let start = url::Url::from_file_path(dir.path().join("index.html")).unwrap();

    let parser = HttpPageParser::new(&user_agent(), vec![]).unwrap();
    let result = CrawlScheduler::new(Arc::new(parser))
        .crawl(&request(&[start.as_str()], 5))
        .await
        .unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(result.get("local"), Some(2));
    assert_eq!(result.get("words"), Some(2));
    assert_eq!(result.get("more"), Some(1));
}

#[tokio::test]
async fn test_crawl_from_config() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        r#"<html><body>The quick fox and the lazy dog <a href="fox.html">fox</a></body></html>"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("fox.html"),
        r#"<html><body>quick quick fox</body></html>"#,
    )
    .unwrap();

    let start = url::Url::from_file_path(dir.path().join("index.html")).unwrap();
    let config = word_ripple::config::parse_config(&format!(
        r#"
start-pages = ["{}"]
ignored-words = ["the|and"]

[crawler]
max-depth = 2
timeout-seconds = 30
popular-word-count = 2
parallelism = 2

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"
"#,
        start
    ))
    .unwrap();

    let result = word_ripple::crawler::crawl(&config).await.unwrap();

    assert_eq!(result.urls_visited, 2);
    let ranked: Vec<(&str, u64)> = result
        .word_counts
        .iter()
        .map(|(w, c)| (w.as_str(), *c))
        .collect();
    assert_eq!(ranked, vec![("quick", 3), ("fox", 3)]);
}
