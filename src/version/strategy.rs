//! Bump strategy selection from commit-message markers.
//!
//! A commit opts into a bump by carrying `[#major]`, `[#minor]`, `[#patch]`
//! or `[#skip]` anywhere in its message (case-insensitive).

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::tags::Commit;

use super::bump::BumpStrategy;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[#(major|minor|patch|skip)\]").expect("marker pattern is valid")
});

/// Find the bump marker in a commit message. The leftmost marker wins.
pub fn marker_in(message: &str) -> Option<BumpStrategy> {
    let caps = MARKER.captures(message)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Pick the strategy from the first commit (in the given order) that carries
/// a marker, or `default` when none does.
pub fn select_strategy(commits: &[Commit], default: BumpStrategy) -> BumpStrategy {
    for commit in commits {
        if let Some(strategy) = marker_in(&commit.message) {
            debug!(sha = %commit.sha, %strategy, "Found bump marker");
            return strategy;
        }
    }

    debug!(%default, commits = commits.len(), "No bump marker found, using default");
    default
}
