//! Scheduler for running one crawl invocation
//!
//! This module handles:
//! - Sizing the worker pool from the request and the host's parallelism
//! - Deriving the crawl deadline
//! - Spawning one top-level task per start page and joining them all
//! - Reducing the shared state to the final `CrawlResult`

use crate::crawler::parser::PageParser;
use crate::crawler::reducer::reduce;
use crate::crawler::request::CrawlRequest;
use crate::crawler::task::{CrawlShared, CrawlTask};
use crate::output::CrawlResult;
use crate::state::{CrawlStatistics, CrawlStats, VisitedSet, WordCountAccumulator};
use crate::{ConfigError, RippleError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Bounded set of worker slots
///
/// A crawl task must hold a slot while it fetches and parses a page, so at
/// most `size` pages are in flight no matter how wide the link graph fans
/// out. Tasks waiting for a slot queue on the semaphore in FIFO order.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool with exactly `size` slots
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerPool)` - Pool ready for use
    /// * `Err(RippleError::ResourceExhaustion)` - `size` is 0 or exceeds what a semaphore can hold
    pub fn new(size: usize) -> Result<Self, RippleError> {
        if size == 0 || size > Semaphore::MAX_PERMITS {
            return Err(RippleError::ResourceExhaustion { requested: size });
        }

        Ok(Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        })
    }

    /// Creates a pool of `min(requested, hardware parallelism)` slots
    pub fn sized_for(requested: usize) -> Result<Self, RippleError> {
        if requested == 0 {
            return Err(RippleError::ResourceExhaustion { requested });
        }
        Self::new(requested.min(hardware_parallelism()))
    }

    /// Waits for a free slot; the slot is returned when the permit drops
    ///
    /// Returns None only if the pool was closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.slots.clone().acquire_owned().await.ok()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Number of hardware threads, or 1 if the host will not say
pub fn hardware_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or_else(|e| {
            tracing::warn!("Cannot determine available parallelism, assuming 1: {}", e);
            1
        })
}

/// Everything learned from one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub result: CrawlResult,

    /// How the crawl's branches ended
    pub stats: CrawlStatistics,

    /// Worker slots the crawl actually ran with
    pub pool_size: usize,

    pub elapsed: Duration,
}

/// Runs crawls against a `PageParser`
///
/// Each call to `crawl` gets fresh shared state; nothing carries over between
/// invocations.
#[derive(Clone)]
pub struct CrawlScheduler {
    parser: Arc<dyn PageParser>,
}

impl CrawlScheduler {
    pub fn new(parser: Arc<dyn PageParser>) -> Self {
        Self { parser }
    }

    /// Crawls from every start page and returns the reduced result
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Ranked word counts and distinct URLs visited
    /// * `Err(RippleError)` - The crawl could not be set up; nothing was fetched
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use std::sync::Arc;
    /// use word_ripple::config::load_config;
    /// use word_ripple::{CrawlRequest, CrawlScheduler, HttpPageParser};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = load_config(Path::new("crawl.toml"))?;
    /// let request = CrawlRequest::from_config(&config)?;
    /// let scheduler = CrawlScheduler::new(Arc::new(HttpPageParser::from_config(&config)?));
    /// let result = scheduler.crawl(&request).await?;
    /// println!("Visited {} pages", result.urls_visited);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResult, RippleError> {
        Ok(self.crawl_detailed(request).await?.result)
    }

    /// Like `crawl`, but also returns branch statistics and timing
    pub async fn crawl_detailed(&self, request: &CrawlRequest) -> Result<CrawlReport, RippleError> {
        let started = Instant::now();

        // Setup: every failure here happens before any task exists
        let pool = WorkerPool::sized_for(request.parallelism)?;
        let deadline = started.checked_add(request.timeout).ok_or_else(|| {
            ConfigError::Validation(format!("timeout {:?} is too large", request.timeout))
        })?;

        let pool_size = pool.size();

        if request.start_pages.is_empty() {
            tracing::info!("No start pages, nothing to crawl");
            return Ok(CrawlReport {
                result: CrawlResult::default(),
                stats: CrawlStatistics::default(),
                pool_size,
                elapsed: started.elapsed(),
            });
        }

        tracing::info!(
            "Starting crawl of {} start pages (max depth {}, timeout {:?}, {} workers)",
            request.start_pages.len(),
            request.max_depth,
            request.timeout,
            pool_size
        );

        let shared = Arc::new(CrawlShared {
            parser: Arc::clone(&self.parser),
            pool,
            ignored_urls: request.ignored_urls.clone(),
            visited: VisitedSet::new(),
            word_counts: WordCountAccumulator::new(),
            stats: CrawlStats::new(),
        });

        let mut roots = JoinSet::new();
        for url in &request.start_pages {
            let task = CrawlTask::new(url.clone(), request.max_depth, deadline, Arc::clone(&shared));
            roots.spawn(task.execute());
        }

        while let Some(joined) = roots.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Top-level crawl task did not finish: {}", e);
            }
        }

        // Every branch has been joined; nothing writes to `shared` any more
        let urls_visited = shared.visited.size();
        let result = reduce(
            &shared.word_counts.snapshot(),
            urls_visited,
            request.popular_word_count,
        );
        let stats = shared.stats.snapshot();
        let elapsed = started.elapsed();

        tracing::info!(
            "Crawl completed: {} pages visited, {} branches in {:?}",
            urls_visited,
            stats.total_branches,
            elapsed
        );

        Ok(CrawlReport {
            result,
            stats,
            pool_size,
            elapsed,
        })
    }
}
