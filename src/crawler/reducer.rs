use crate::output::CrawlResult;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Reduces the final word totals to the `popular_word_count` most popular
///
/// Ranking, highest first:
/// 1. count, descending
/// 2. word length in characters, descending
/// 3. the word itself, descending
///
/// The order is total, so the result does not depend on the map's iteration
/// order.
pub fn reduce(
    word_counts: &HashMap<String, u64>,
    urls_visited: usize,
    popular_word_count: usize,
) -> CrawlResult {
    if word_counts.is_empty() {
        return CrawlResult::new(Vec::new(), urls_visited);
    }

    let mut ranked: Vec<(String, u64)> = word_counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();
    ranked.sort_unstable_by(rank);
    ranked.truncate(popular_word_count);

    CrawlResult::new(ranked, urls_visited)
}

fn rank(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
        .then_with(|| b.0.cmp(&a.0))
}
