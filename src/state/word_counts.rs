use dashmap::DashMap;
use std::collections::HashMap;

/// Concurrency-safe running word totals for one crawl
///
/// Every update goes through `merge`, which adds under the per-shard lock so
/// concurrent merges touching the same word never lose an increment.
#[derive(Debug, Default)]
pub struct WordCountAccumulator {
    counts: DashMap<String, u64>,
}

impl WordCountAccumulator {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one page's word counts into the running totals
    pub fn merge(&self, page_counts: &HashMap<String, u64>) {
        for (word, count) in page_counts {
            *self.counts.entry(word.clone()).or_insert(0) += *count;
        }
    }

    /// Copies the totals out
    ///
    /// Only meaningful once every merging task has finished; the scheduler
    /// calls it after the last branch has been joined.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
