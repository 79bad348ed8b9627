//! The recursive unit of crawl work
//!
//! A `CrawlTask` checks policy, claims its URL, fetches it while holding a
//! worker slot, merges the page's words, then fans out one child task per
//! link and joins them all before it counts as finished.

use crate::config::FullMatchPattern;
use crate::crawler::parser::PageParser;
use crate::crawler::policy;
use crate::crawler::scheduler::WorkerPool;
use crate::state::{BranchOutcome, CrawlStats, VisitedSet, WordCountAccumulator};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// State shared by every task of one crawl invocation
pub(crate) struct CrawlShared {
    pub parser: Arc<dyn PageParser>,
    pub pool: WorkerPool,
    pub ignored_urls: Vec<FullMatchPattern>,
    pub visited: VisitedSet,
    pub word_counts: WordCountAccumulator,
    pub stats: CrawlStats,
}

/// One branch of the crawl
///
/// `depth` and `deadline` are this branch's own copies; only `shared` is
/// common to all branches.
pub(crate) struct CrawlTask {
    url: String,
    depth: u32,
    deadline: Instant,
    shared: Arc<CrawlShared>,
}

impl CrawlTask {
    pub fn new(url: String, depth: u32, deadline: Instant, shared: Arc<CrawlShared>) -> Self {
        Self {
            url,
            depth,
            deadline,
            shared,
        }
    }

    /// Runs this branch and its whole subtree to completion
    ///
    /// Boxed so the future can recurse through `JoinSet::spawn`.
    pub fn execute(self) -> BoxFuture<'static, ()> {
        async move {
            let Some(links) = self.visit().await else {
                return;
            };

            let child_depth = self.depth.saturating_sub(1);
            let mut children = JoinSet::new();
            for link in links {
                let child = CrawlTask::new(link, child_depth, self.deadline, Arc::clone(&self.shared));
                children.spawn(child.execute());
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Crawl task under {} did not finish: {}", self.url, e);
                }
            }
        }
        .boxed()
    }

    /// Steps 1-4 of a branch; returns the links to fan out to, if any
    async fn visit(&self) -> Option<Vec<String>> {
        let shared = &self.shared;

        if let Some(reason) = policy::stop_reason(
            &self.url,
            self.depth,
            self.deadline,
            Instant::now(),
            &shared.ignored_urls,
        ) {
            return self.finish(reason);
        }

        // Released before the fan-out so a parent never holds a slot while
        // waiting on its children
        let _slot = shared.pool.acquire().await?;

        // Waiting for a slot may have run past the deadline
        if policy::deadline_passed(self.deadline, Instant::now()) {
            return self.finish(BranchOutcome::DeadlinePassed);
        }

        if !shared.visited.try_claim(&self.url) {
            return self.finish(BranchOutcome::AlreadyVisited);
        }

        match shared.parser.parse(&self.url).await {
            Ok(content) => {
                shared.word_counts.merge(&content.word_counts);
                shared.stats.record(BranchOutcome::Processed);
                tracing::debug!(
                    "Processed {} at depth {}: {} distinct words, {} links",
                    self.url,
                    self.depth,
                    content.word_counts.len(),
                    content.links.len()
                );
                Some(content.links)
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", self.url, e);
                self.finish(BranchOutcome::FetchFailed)
            }
        }
    }

    fn finish(&self, outcome: BranchOutcome) -> Option<Vec<String>> {
        tracing::trace!("Branch {} ended: {}", self.url, outcome);
        self.shared.stats.record(outcome);
        None
    }
}
