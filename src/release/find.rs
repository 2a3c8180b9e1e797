//! Picking the releases that matter out of the repository's release list

use crate::config::Config;
use crate::types::Release;
use chrono::{DateTime, Utc};

/// The releases a run cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingReleases {
    /// Latest published release; bounds the history window
    pub previous: Option<Release>,
    /// Draft to update for this branch
    pub draft: Option<Release>,
}

impl ExistingReleases {
    /// Start of the history window
    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.previous.as_ref().and_then(|r| r.published_at)
    }
}

/// Split the release list into the bounding release and the branch draft
pub fn inspect_releases(releases: &[Release], branch: &str, config: &Config) -> ExistingReleases {
    ExistingReleases {
        previous: find_previous_release(releases, branch, config).cloned(),
        draft: find_draft_for_branch(releases, branch).cloned(),
    }
}

/// Latest published release that counts for `branch`
///
/// Drafts never count. Prereleases count only with `include-pre-releases`;
/// with `filter-by-commitish` only releases targeting the branch count.
/// Newest `published_at` wins (`created_at` when unpublished), then the
/// highest id.
pub fn find_previous_release<'a>(
    releases: &'a [Release],
    branch: &str,
    config: &Config,
) -> Option<&'a Release> {
    releases
        .iter()
        .filter(|r| !r.draft)
        .filter(|r| config.include_pre_releases || !r.prerelease)
        .filter(|r| !config.filter_by_commitish || r.targets_branch(branch))
        .max_by_key(|r| (r.published_at.or(r.created_at), r.id))
}

/// Draft release targeting `branch`; the most recently created wins
pub fn find_draft_for_branch<'a>(releases: &'a [Release], branch: &str) -> Option<&'a Release> {
    releases
        .iter()
        .filter(|r| r.draft && r.targets_branch(branch))
        .max_by_key(|r| (r.created_at, r.id))
}
