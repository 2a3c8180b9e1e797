//! Pull request history resolution
//!
//! Walks branch history page by page (newest first) and reduces whatever
//! merge strategy the repository uses into one list of merged pull requests.

mod extract;
mod pages;

pub use extract::{detect_strategy, extract};
pub use pages::{FixedPages, HostPages, PageSource};

use crate::error::Result;
use crate::types::{Commit, MergedPullRequest};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Everything learned from the history window
#[derive(Debug, Clone, Default)]
pub struct ResolvedHistory {
    /// Commits at or after `since`, newest first
    pub commits: Vec<Commit>,
    /// Merged pull requests, first-seen order, unique by number
    pub pull_requests: Vec<MergedPullRequest>,
    /// Commits that matched no merge strategy shape
    pub skipped_commits: usize,
}

impl ResolvedHistory {
    /// Whether the window contained no pull requests
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty()
    }
}

/// Resolve merged pull requests from a page source
///
/// Stops pulling pages once a page reaches back past `since`, or when the
/// source is exhausted. Commits older than `since` are ignored. Any page
/// error aborts the whole resolution; nothing from a failed page is used.
pub async fn resolve_history(
    pages: &mut dyn PageSource,
    since: Option<DateTime<Utc>>,
) -> Result<ResolvedHistory> {
    let mut resolved = ResolvedHistory::default();
    let mut seen: HashSet<u64> = HashSet::new();

    while let Some(page) = pages.next_page().await? {
        let oldest = page.commits.iter().map(|c| c.committed_at).min();
        let reached_since = matches!((since, oldest), (Some(s), Some(o)) if o < s);

        for commit in page.commits {
            if since.is_some_and(|s| commit.committed_at < s) {
                continue;
            }

            match detect_strategy(&commit) {
                Some(strategy) => {
                    if let Some(pr) = extract(&commit, strategy)
                        && seen.insert(pr.number)
                    {
                        debug!(
                            pr_number = pr.number,
                            %strategy,
                            sha = %commit.sha,
                            "resolved pull request"
                        );
                        resolved.pull_requests.push(pr);
                    }
                }
                None => {
                    debug!(sha = %commit.sha, "commit references no pull request, skipping");
                    resolved.skipped_commits += 1;
                }
            }
            resolved.commits.push(commit);
        }

        if reached_since {
            debug!("history reached the previous release, stopping");
            break;
        }
    }

    debug!(
        pull_requests = resolved.pull_requests.len(),
        commits = resolved.commits.len(),
        skipped = resolved.skipped_commits,
        "resolved history"
    );
    Ok(resolved)
}
