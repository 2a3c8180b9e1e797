//! Platform services for release drafting
//!
//! Abstracts the three upstream capabilities the engine needs (release
//! listing, branch history, release writes) plus config file access.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{HistoryPage, NewRelease, PlatformConfig, Release};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Platform service trait for release operations
///
/// Every method is a single fallible call: timeouts and retries are the
/// implementation's business, the engine never retries.
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Read a file from the repository's default branch
    ///
    /// Returns `Ok(None)` when the file does not exist.
    async fn fetch_file(&self, path: &str) -> Result<Option<String>>;

    /// List every release of the repository, following pagination
    async fn list_releases(&self) -> Result<Vec<Release>>;

    /// Fetch one page of history reachable from `branch`, newest first
    ///
    /// `cursor` is the previous page's `end_cursor`; `None` requests the
    /// first page.
    async fn history_page(
        &self,
        branch: &str,
        since: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<HistoryPage>;

    /// Create a new release
    async fn create_release(&self, release: &NewRelease) -> Result<Release>;

    /// Replace the body of an existing release, leaving tag and name alone
    async fn update_release(&self, release_id: u64, body: &str) -> Result<Release>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
