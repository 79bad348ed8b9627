use crate::crawler::CrawlReport;
use crate::state::{BranchOutcome, CrawlStatistics};
use std::fmt::Write;

/// Sums the branches whose outcome satisfies `category`
fn count_where(stats: &CrawlStatistics, category: fn(&BranchOutcome) -> bool) -> u64 {
    stats
        .branches_by_outcome
        .iter()
        .filter(|(outcome, _)| category(outcome))
        .map(|(_, count)| count)
        .sum()
}

/// Renders a crawl report as plain text
pub fn format_summary(report: &CrawlReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Summary ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  URLs visited: {}", report.result.urls_visited);
    let _ = writeln!(out, "  Branches run: {}", stats.total_branches);
    let _ = writeln!(out, "    fetched: {}", count_where(stats, BranchOutcome::is_success));
    let _ = writeln!(out, "    skipped: {}", count_where(stats, BranchOutcome::is_skipped));
    let _ = writeln!(out, "    failed: {}", count_where(stats, BranchOutcome::is_error));
    let _ = writeln!(out, "  Workers: {}", report.pool_size);
    let _ = writeln!(out, "  Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    let _ = writeln!(out);

    if !stats.branches_by_outcome.is_empty() {
        let _ = writeln!(out, "Branches by Outcome:");
        // Sort outcomes by count (descending), then name for stable output
        let mut outcome_counts: Vec<_> = stats.branches_by_outcome.iter().collect();
        outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

        for (outcome, count) in outcome_counts {
            let percentage = (*count as f64 / stats.total_branches as f64) * 100.0;
            let _ = writeln!(out, "  {}: {} ({:.1}%)", outcome, count, percentage);
        }
        let _ = writeln!(out);
    }

    if report.result.word_counts.is_empty() {
        let _ = writeln!(out, "No words counted.");
    } else {
        let _ = writeln!(out, "Popular Words:");
        for (rank, (word, count)) in report.result.word_counts.iter().enumerate() {
            let _ = writeln!(out, "  {:>3}. {} ({})", rank + 1, word, count);
        }
    }

    out
}

/// Prints the crawl summary to stdout
pub fn print_summary(report: &CrawlReport) {
    print!("{}", format_summary(report));
}
