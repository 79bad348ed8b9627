use crate::state::outcome::BranchOutcome;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free per-outcome branch counters shared by all tasks of one crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    counters: [AtomicU64; 6],
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records how one branch ended
    pub fn record(&self, outcome: BranchOutcome) {
        self.counters[outcome.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, outcome: BranchOutcome) -> u64 {
        self.counters[outcome.index()].load(Ordering::Relaxed)
    }

    /// Freezes the counters into a plain statistics value
    pub fn snapshot(&self) -> CrawlStatistics {
        let branches_by_outcome: HashMap<BranchOutcome, u64> = BranchOutcome::all()
            .into_iter()
            .map(|outcome| (outcome, self.count(outcome)))
            .filter(|(_, count)| *count > 0)
            .collect();

        CrawlStatistics {
            total_branches: branches_by_outcome.values().sum(),
            branches_by_outcome,
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of branches that ran, whatever their outcome
    pub total_branches: u64,

    /// Count of branches by outcome (zero counts omitted)
    pub branches_by_outcome: HashMap<BranchOutcome, u64>,
}

impl CrawlStatistics {
    pub fn count(&self, outcome: BranchOutcome) -> u64 {
        self.branches_by_outcome.get(&outcome).copied().unwrap_or(0)
    }
}
