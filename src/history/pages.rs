//! Cursor-driven history paging
//!
//! A page source is a lazy, finite, non-restartable sequence of history
//! pages. The resolver only sees this trait, so it can be driven by the
//! platform or by pages held in memory.

use crate::error::{Error, Result};
use crate::platform::ReleaseHost;
use crate::types::HistoryPage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

/// A sequence of history pages, newest first
#[async_trait]
pub trait PageSource: Send {
    /// Next page, or `None` once the sequence is exhausted
    async fn next_page(&mut self) -> Result<Option<HistoryPage>>;
}

/// Pages fetched from a [`ReleaseHost`], one request per page
///
/// Each request needs the previous page's cursor, so pages are strictly
/// sequential.
pub struct HostPages<'a> {
    host: &'a dyn ReleaseHost,
    branch: String,
    since: Option<DateTime<Utc>>,
    cursor: Option<String>,
    finished: bool,
    fetched: usize,
}

impl<'a> HostPages<'a> {
    /// Page through `branch` history back to `since`
    pub fn new(host: &'a dyn ReleaseHost, branch: &str, since: Option<DateTime<Utc>>) -> Self {
        Self {
            host,
            branch: branch.to_string(),
            since,
            cursor: None,
            finished: false,
            fetched: 0,
        }
    }

    /// Pages fetched so far
    pub const fn fetched(&self) -> usize {
        self.fetched
    }
}

#[async_trait]
impl PageSource for HostPages<'_> {
    async fn next_page(&mut self) -> Result<Option<HistoryPage>> {
        if self.finished {
            return Ok(None);
        }

        let page = match self
            .host
            .history_page(&self.branch, self.since, self.cursor.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(Error::fetch(
                    &format!("history page {} of {}", self.fetched + 1, self.branch),
                    &e,
                ));
            }
        };

        self.fetched += 1;
        // A page without a cursor can't be continued, whatever it claims
        self.finished = !page.has_next_page || page.end_cursor.is_none();
        self.cursor.clone_from(&page.end_cursor);

        debug!(
            page = self.fetched,
            commits = page.commits.len(),
            finished = self.finished,
            "received history page"
        );
        Ok(Some(page))
    }
}

/// Pages replayed from memory
///
/// Used to re-run the resolver over history captured earlier, and in tests.
#[derive(Debug, Default)]
pub struct FixedPages {
    pages: VecDeque<Result<HistoryPage>>,
    served: usize,
}

impl FixedPages {
    /// Replay these pages in order
    pub fn new(pages: impl IntoIterator<Item = HistoryPage>) -> Self {
        Self {
            pages: pages.into_iter().map(Ok).collect(),
            served: 0,
        }
    }

    /// Append a failing page after the ones already queued
    #[must_use]
    pub fn then_fail(mut self, message: &str) -> Self {
        self.pages
            .push_back(Err(Error::Fetch(format!("history page: {message}"))));
        self
    }

    /// Pages handed out so far (including a failed one)
    pub const fn served(&self) -> usize {
        self.served
    }
}

#[async_trait]
impl PageSource for FixedPages {
    async fn next_page(&mut self) -> Result<Option<HistoryPage>> {
        let next = self.pages.pop_front();
        if next.is_some() {
            self.served += 1;
        }
        next.transpose()
    }
}
