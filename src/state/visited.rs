use dashmap::DashSet;

/// Concurrency-safe set of URLs claimed during one crawl
///
/// URLs are never removed. `try_claim` is the only way in, so at most one
/// branch ever owns a given URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims `url` for the calling branch
    ///
    /// # Returns
    ///
    /// * `true` - The URL was absent and is now claimed by the caller
    /// * `false` - Some branch already claimed it; the set is unchanged
    pub fn try_claim(&self, url: &str) -> bool {
        // DashSet::insert holds the shard lock across the lookup and insert
        self.urls.insert(url.to_string())
    }

    /// Number of distinct URLs claimed so far
    pub fn size(&self) -> usize {
        self.urls.len()
    }
}
