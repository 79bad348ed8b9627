//! Per-branch stop checks
//!
//! Decides, before any fetch, whether a branch may go on. The cheap depth and
//! deadline checks run before any pattern matching.

use crate::config::FullMatchPattern;
use crate::state::BranchOutcome;
use std::time::Instant;

/// Returns true when the branch for `url` must not be processed
pub fn should_stop(
    url: &str,
    remaining_depth: u32,
    deadline: Instant,
    now: Instant,
    ignored_urls: &[FullMatchPattern],
) -> bool {
    stop_reason(url, remaining_depth, deadline, now, ignored_urls).is_some()
}

/// Like `should_stop`, but names the first check that failed
pub fn stop_reason(
    url: &str,
    remaining_depth: u32,
    deadline: Instant,
    now: Instant,
    ignored_urls: &[FullMatchPattern],
) -> Option<BranchOutcome> {
    if remaining_depth == 0 {
        return Some(BranchOutcome::DepthExhausted);
    }

    if deadline_passed(deadline, now) {
        return Some(BranchOutcome::DeadlinePassed);
    }

    if is_ignored(url, ignored_urls) {
        return Some(BranchOutcome::Ignored);
    }

    None
}

/// The deadline itself already counts as passed
pub fn deadline_passed(deadline: Instant, now: Instant) -> bool {
    now >= deadline
}

/// True when `url` fully matches any ignored pattern
pub fn is_ignored(url: &str, ignored_urls: &[FullMatchPattern]) -> bool {
    ignored_urls.iter().any(|pattern| pattern.is_match(url))
}
