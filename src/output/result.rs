use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Final outcome of one crawl invocation
///
/// `word_counts` is in rank order, most popular first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub word_counts: Vec<(String, u64)>,
    pub urls_visited: usize,
}

impl CrawlResult {
    pub fn new(word_counts: Vec<(String, u64)>, urls_visited: usize) -> Self {
        Self {
            word_counts,
            urls_visited,
        }
    }

    /// Count of one word, if it made it into the result
    pub fn get(&self, word: &str) -> Option<u64> {
        self.word_counts
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, count)| *count)
    }
}

/// Serialized as `{"wordCounts": {...}, "urlsVisited": n}`, keeping rank order
impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CrawlResult", 2)?;
        state.serialize_field("wordCounts", &RankedWords(&self.word_counts))?;
        state.serialize_field("urlsVisited", &self.urls_visited)?;
        state.end()
    }
}

struct RankedWords<'a>(&'a [(String, u64)]);

impl Serialize for RankedWords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(word, count)| (word, count)))
    }
}
