//! Branch outcome definitions for tracking crawl progress
//!
//! Every crawl branch ends in exactly one of these outcomes.

use std::fmt;

/// How a single crawl branch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchOutcome {
    // ===== Terminal Success States =====
    /// Page was fetched, its words merged, and its links fanned out
    Processed,

    // ===== Policy Stops =====
    /// No depth budget left for this branch
    DepthExhausted,

    /// The crawl deadline had passed before the fetch could begin
    DeadlinePassed,

    /// URL fully matched an ignored-url pattern
    Ignored,

    /// Another branch had already claimed this URL
    AlreadyVisited,

    // ===== Terminal Error States =====
    /// The page parser failed for this URL
    FetchFailed,
}

impl BranchOutcome {
    /// Returns true if the page was actually fetched and counted
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if a policy check ended the branch before any fetch
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::DepthExhausted | Self::DeadlinePassed | Self::Ignored | Self::AlreadyVisited
        )
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }

    /// Stable snake_case name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::DepthExhausted => "depth_exhausted",
            Self::DeadlinePassed => "deadline_passed",
            Self::Ignored => "ignored",
            Self::AlreadyVisited => "already_visited",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Dense index used by the lock-free counters in `CrawlStats`
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Processed => 0,
            Self::DepthExhausted => 1,
            Self::DeadlinePassed => 2,
            Self::Ignored => 3,
            Self::AlreadyVisited => 4,
            Self::FetchFailed => 5,
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> [Self; 6] {
        [
            Self::Processed,
            Self::DepthExhausted,
            Self::DeadlinePassed,
            Self::Ignored,
            Self::AlreadyVisited,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
