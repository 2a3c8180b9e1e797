//! Error types for release-drafter

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a drafting run
///
/// A missing configuration file or an ineligible branch are not errors: the
/// pipeline reports them as [`crate::pipeline::SkipReason`]s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A paginated read (releases, history, config) failed
    #[error("failed to fetch {0}")]
    Fetch(String),

    /// The final release write failed; no release was mutated
    #[error("failed to write release: {0}")]
    Write(String),

    /// The configuration file exists but cannot be used
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The push event payload is unusable
    #[error("invalid push event: {0}")]
    Event(String),

    /// No usable token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// GitHub API returned something unexpected
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic transport failure (used by non-GitHub hosts and mocks)
    #[error("platform error: {0}")]
    Platform(String),

    /// Error from octocrab
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a read failure with the name of the resource being read
    pub fn fetch(what: &str, source: &Self) -> Self {
        Self::Fetch(format!("{what}: {source}"))
    }

    /// Whether this error came from the final write rather than a read
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}
