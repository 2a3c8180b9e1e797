//! Push event payloads delivered by GitHub Actions

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Fallback when the payload names no default branch
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// The fields of a push event the drafter reads
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PushEvent {
    /// Pushed ref, e.g. `refs/heads/master`
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Repository the push went to
    pub repository: EventRepository,
}

/// Repository block of the payload
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventRepository {
    /// Repository name
    pub name: String,
    /// `owner/name`
    #[serde(default)]
    pub full_name: Option<String>,
    /// Repository owner
    pub owner: EventOwner,
    /// Default branch
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Older payloads carry this instead of `default_branch`
    #[serde(default)]
    pub master_branch: Option<String>,
}

/// Owner block; push payloads use `name`, others `login`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventOwner {
    /// Account login
    #[serde(default)]
    pub login: Option<String>,
    /// Account name
    #[serde(default)]
    pub name: Option<String>,
}

impl PushEvent {
    /// Parse a payload
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Event(format!("invalid push payload: {e}")))
    }

    /// Read and parse the payload file at `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Event(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Repository default branch
    pub fn default_branch(&self) -> &str {
        self.repository
            .default_branch
            .as_deref()
            .or(self.repository.master_branch.as_deref())
            .filter(|b| !b.is_empty())
            .unwrap_or(FALLBACK_DEFAULT_BRANCH)
    }

    /// Repository owner login
    pub fn owner(&self) -> Result<String> {
        let repo = &self.repository;
        repo.owner
            .login
            .clone()
            .or_else(|| repo.owner.name.clone())
            .or_else(|| {
                repo.full_name
                    .as_deref()
                    .and_then(|full| full.split_once('/'))
                    .map(|(owner, _)| owner.to_string())
            })
            .ok_or_else(|| Error::Event("payload names no repository owner".to_string()))
    }

    /// Platform coordinates for the pushed repository
    pub fn platform_config(&self, host: Option<String>) -> Result<PlatformConfig> {
        Ok(PlatformConfig {
            owner: self.owner()?,
            repo: self.repository.name.clone(),
            host,
        })
    }
}

/// Branch a run targets
///
/// A non-empty `override_ref` (the `GITHUB_REF` of the run) wins over the
/// payload ref. A `refs/heads/` prefix is stripped; tag refs are returned
/// whole so they never match a branch name.
pub fn effective_branch(event_ref: &str, override_ref: Option<&str>) -> String {
    let git_ref = override_ref.filter(|r| !r.is_empty()).unwrap_or(event_ref);
    git_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(git_ref)
        .to_string()
}
