//! Core types for release-drafter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a commit or pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Author {
    /// Display name (git author name for commits)
    pub name: String,
    /// Platform handle, if the author maps to an account
    pub login: Option<String>,
}

impl Author {
    /// Author with a platform handle
    pub fn user(login: &str) -> Self {
        Self {
            name: login.to_string(),
            login: Some(login.to_string()),
        }
    }

    /// Author known only by display name
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            login: None,
        }
    }

    /// `@login` when linkable, otherwise the plain display name
    pub fn mention(&self) -> String {
        self.login
            .as_ref()
            .map_or_else(|| self.name.clone(), |login| format!("@{login}"))
    }

    /// Login when available, otherwise the display name
    pub fn handle(&self) -> &str {
        self.login.as_deref().unwrap_or(&self.name)
    }
}

/// A commit reachable from the target branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Commit author
    pub author: Author,
    /// When the commit landed
    pub committed_at: DateTime<Utc>,
    /// Merged pull request the platform associates with this commit
    pub pull_request: Option<MergedPullRequest>,
}

impl Commit {
    /// First line of the commit message
    pub fn heading(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// A pull request merged into the target branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedPullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR author
    pub author: Author,
    /// Label names (unique, platform order)
    pub labels: Vec<String>,
    /// When the PR was merged
    pub merged_at: DateTime<Utc>,
    /// PR description
    pub body: String,
}

impl MergedPullRequest {
    /// Whether the PR carries any of the given labels
    pub fn has_any_label(&self, labels: &[String]) -> bool {
        self.labels.iter().any(|l| labels.contains(l))
    }
}

/// How a pull request's commits reached the branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// A merge commit the platform links to the PR
    MergeCommit,
    /// One squashed commit titled `<title> (#<n>)`
    Squash,
    /// Rebased commits that reference `#<n>` in their message
    Rebase,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MergeCommit => write!(f, "merge-commit"),
            Self::Squash => write!(f, "squash"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// One page of branch history, newest commit first
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    /// Commits on this page
    pub commits: Vec<Commit>,
    /// Whether the platform has another page after this one
    pub has_next_page: bool,
    /// Cursor to request the next page with
    pub end_cursor: Option<String>,
}

/// A release as stored on the platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Git tag name (empty for untagged drafts)
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release notes
    pub body: String,
    /// Whether the release is an unpublished draft
    pub draft: bool,
    /// Whether the release is marked as a prerelease
    pub prerelease: bool,
    /// Branch or commit the release targets
    pub target_commitish: String,
    /// When the release object was created
    pub created_at: Option<DateTime<Utc>>,
    /// When the release was published (None for drafts)
    pub published_at: Option<DateTime<Utc>>,
    /// Web URL for the release
    pub html_url: String,
}

impl Release {
    /// Whether this release targets `branch` (`refs/heads/` prefix tolerated)
    pub fn targets_branch(&self, branch: &str) -> bool {
        let target = self
            .target_commitish
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.target_commitish);
        target == branch
    }
}

/// Fields for creating a release
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRelease {
    /// Git tag name
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release notes
    pub body: String,
    /// Branch the release targets
    pub target_commitish: String,
    /// Whether to create the release as a draft
    pub draft: bool,
}

/// Repository coordinates on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom API base URL (None for api.github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
