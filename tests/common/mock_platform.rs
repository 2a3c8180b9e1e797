//! Mock release host for testing
//!
//! These are test utilities - not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use release_drafter::error::{Error, Result};
use release_drafter::platform::ReleaseHost;
use release_drafter::types::{Commit, HistoryPage, NewRelease, PlatformConfig, Release};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `history_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryCall {
    pub branch: String,
    pub since: Option<DateTime<Utc>>,
    pub cursor: Option<String>,
}

/// Call record for `update_release`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReleaseCall {
    pub release_id: u64,
    pub body: String,
}

/// In-memory release host
///
/// Manually implements `ReleaseHost` so it can hold state across runs:
/// created drafts show up in later `list_releases` calls, and updates
/// change the stored body.
///
/// Features:
/// - Config file, releases and history pages set up front
/// - Call tracking for verification
/// - Error injection per operation
pub struct MockReleaseHost {
    config: PlatformConfig,
    next_release_id: AtomicU64,
    config_file: Mutex<Option<String>>,
    releases: Mutex<Vec<Release>>,
    history: Mutex<Vec<Vec<Commit>>>,
    // Call tracking
    fetch_file_calls: Mutex<Vec<String>>,
    list_releases_calls: Mutex<usize>,
    history_calls: Mutex<Vec<HistoryCall>>,
    create_release_calls: Mutex<Vec<NewRelease>>,
    update_release_calls: Mutex<Vec<UpdateReleaseCall>>,
    // Error injection
    error_on_fetch_file: Mutex<Option<String>>,
    error_on_list_releases: Mutex<Option<String>>,
    error_on_history_page: Mutex<Option<(usize, String)>>,
    error_on_create_release: Mutex<Option<String>>,
    error_on_update_release: Mutex<Option<String>>,
}

impl MockReleaseHost {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_release_id: AtomicU64::new(1000),
            config_file: Mutex::new(None),
            releases: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            fetch_file_calls: Mutex::new(Vec::new()),
            list_releases_calls: Mutex::new(0),
            history_calls: Mutex::new(Vec::new()),
            create_release_calls: Mutex::new(Vec::new()),
            update_release_calls: Mutex::new(Vec::new()),
            error_on_fetch_file: Mutex::new(None),
            error_on_list_releases: Mutex::new(None),
            error_on_history_page: Mutex::new(None),
            error_on_create_release: Mutex::new(None),
            error_on_update_release: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Store a config file in the repository
    pub fn set_config_file(&self, content: &str) {
        *self.config_file.lock().unwrap() = Some(content.to_string());
    }

    /// Replace the release list
    pub fn set_releases(&self, releases: Vec<Release>) {
        *self.releases.lock().unwrap() = releases;
    }

    /// Replace branch history; each inner vec is one page, newest first
    pub fn set_history_pages(&self, pages: Vec<Vec<Commit>>) {
        *self.history.lock().unwrap() = pages;
    }

    /// Put all commits on one page
    pub fn set_history(&self, commits: Vec<Commit>) {
        self.set_history_pages(vec![commits]);
    }

    // === Error injection methods ===

    /// Make `fetch_file` return an error
    pub fn fail_fetch_file(&self, msg: &str) {
        *self.error_on_fetch_file.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_releases` return an error
    pub fn fail_list_releases(&self, msg: &str) {
        *self.error_on_list_releases.lock().unwrap() = Some(msg.to_string());
    }

    /// Make requests for history page `page` (0-based) return an error
    pub fn fail_history_page(&self, page: usize, msg: &str) {
        *self.error_on_history_page.lock().unwrap() = Some((page, msg.to_string()));
    }

    /// Make `create_release` return an error
    pub fn fail_create_release(&self, msg: &str) {
        *self.error_on_create_release.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_release` return an error
    pub fn fail_update_release(&self, msg: &str) {
        *self.error_on_update_release.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn get_fetch_file_calls(&self) -> Vec<String> {
        self.fetch_file_calls.lock().unwrap().clone()
    }

    pub fn list_releases_call_count(&self) -> usize {
        *self.list_releases_calls.lock().unwrap()
    }

    pub fn get_history_calls(&self) -> Vec<HistoryCall> {
        self.history_calls.lock().unwrap().clone()
    }

    pub fn get_create_release_calls(&self) -> Vec<NewRelease> {
        self.create_release_calls.lock().unwrap().clone()
    }

    pub fn get_update_release_calls(&self) -> Vec<UpdateReleaseCall> {
        self.update_release_calls.lock().unwrap().clone()
    }

    /// Releases as currently stored
    pub fn releases(&self) -> Vec<Release> {
        self.releases.lock().unwrap().clone()
    }

    /// Total writes attempted
    pub fn write_count(&self) -> usize {
        self.create_release_calls.lock().unwrap().len()
            + self.update_release_calls.lock().unwrap().len()
    }

    // === Assertions ===

    pub fn assert_no_writes(&self) {
        assert_eq!(
            self.write_count(),
            0,
            "Expected no release writes, got creates {:?} and updates {:?}",
            self.get_create_release_calls(),
            self.get_update_release_calls()
        );
    }

    pub fn assert_no_reads_past_config(&self) {
        assert_eq!(self.list_releases_call_count(), 0, "releases were listed");
        assert!(self.get_history_calls().is_empty(), "history was read");
    }

    /// Body of the single created release
    pub fn created_body(&self) -> String {
        let calls = self.get_create_release_calls();
        assert_eq!(calls.len(), 1, "Expected exactly one create, got {calls:?}");
        calls[0].body.clone()
    }

    pub fn assert_updated(&self, release_id: u64, body: &str) {
        let calls = self.get_update_release_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.release_id == release_id && c.body == body),
            "Expected update of release {release_id} with body {body:?}, got {calls:?}"
        );
    }
}

fn page_cursor(index: usize) -> String {
    format!("page-{index}")
}

#[async_trait]
impl ReleaseHost for MockReleaseHost {
    async fn fetch_file(&self, path: &str) -> Result<Option<String>> {
        self.fetch_file_calls.lock().unwrap().push(path.to_string());
        if let Some(msg) = self.error_on_fetch_file.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.config_file.lock().unwrap().clone())
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        *self.list_releases_calls.lock().unwrap() += 1;
        if let Some(msg) = self.error_on_list_releases.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.releases.lock().unwrap().clone())
    }

    async fn history_page(
        &self,
        branch: &str,
        since: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        self.history_calls.lock().unwrap().push(HistoryCall {
            branch: branch.to_string(),
            since,
            cursor: cursor.map(ToString::to_string),
        });

        let index = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| Error::GitHubApi(format!("unknown cursor {c}")))?,
        };

        if let Some((page, msg)) = self.error_on_history_page.lock().unwrap().as_ref()
            && *page == index
        {
            return Err(Error::Platform(msg.clone()));
        }

        let pages = self.history.lock().unwrap();
        let commits = pages.get(index).cloned().unwrap_or_default();
        let has_next_page = index + 1 < pages.len();
        Ok(HistoryPage {
            commits,
            has_next_page,
            end_cursor: has_next_page.then(|| page_cursor(index + 1)),
        })
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        self.create_release_calls
            .lock()
            .unwrap()
            .push(release.clone());
        if let Some(msg) = self.error_on_create_release.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let id = self.next_release_id.fetch_add(1, Ordering::SeqCst);
        let created = Release {
            id,
            tag_name: release.tag_name.clone(),
            name: release.name.clone(),
            body: release.body.clone(),
            draft: release.draft,
            prerelease: false,
            target_commitish: release.target_commitish.clone(),
            created_at: Some(Utc::now()),
            published_at: None,
            html_url: format!(
                "https://github.com/{}/releases/{id}",
                self.config.full_name()
            ),
        };
        self.releases.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_release(&self, release_id: u64, body: &str) -> Result<Release> {
        self.update_release_calls
            .lock()
            .unwrap()
            .push(UpdateReleaseCall {
                release_id,
                body: body.to_string(),
            });
        if let Some(msg) = self.error_on_update_release.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let mut releases = self.releases.lock().unwrap();
        let release = releases
            .iter_mut()
            .find(|r| r.id == release_id)
            .ok_or_else(|| Error::GitHubApi(format!("release {release_id} not found")))?;
        release.body = body.to_string();
        Ok(release.clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
