//! One drafting run, end to end
//!
//! Reads happen first and the single write happens last, so any failure
//! before the write leaves every release untouched.

use crate::changelog::{ReleaseNotes, build_release_notes};
use crate::config::{Config, load_config};
use crate::error::{Error, Result};
use crate::history::{HostPages, resolve_history};
use crate::platform::ReleaseHost;
use crate::release::{ReleaseAction, execute_release, inspect_releases, plan_release};
use crate::types::Release;
use std::fmt;
use tracing::{debug, info};

/// Which branch a run is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    /// Pushed branch, without `refs/heads/`
    pub branch: String,
    /// Repository default branch
    pub default_branch: String,
}

impl RunTarget {
    /// Target `branch` in a repository whose default is `default_branch`
    pub fn new(branch: impl Into<String>, default_branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            default_branch: default_branch.into(),
        }
    }
}

/// Why a run did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The repository has no config file
    ConfigNotFound,
    /// Pushes to this branch don't update a draft
    BranchNotEligible(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigNotFound => write!(f, "no configuration file found"),
            Self::BranchNotEligible(branch) => {
                write!(f, "branch {branch} is not configured for drafting")
            }
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was read past the gate and nothing was written
    Skipped(SkipReason),
    /// Dry run: what would have been written
    Planned(ReleaseAction),
    /// A new draft was created
    Created(Release),
    /// The existing draft was updated
    Updated(Release),
}

impl Outcome {
    /// The release written, if any
    pub const fn release(&self) -> Option<&Release> {
        match self {
            Self::Created(release) | Self::Updated(release) => Some(release),
            Self::Skipped(_) | Self::Planned(_) => None,
        }
    }
}

/// Everything gathered and built before the write
#[derive(Debug, Clone)]
pub struct Draft {
    /// Rendered notes
    pub notes: ReleaseNotes,
    /// Planned write
    pub action: ReleaseAction,
    /// Commits ignored because they matched no merge strategy
    pub skipped_commits: usize,
}

/// Gather and build: every read of a run, no writes
pub async fn prepare_draft(
    host: &dyn ReleaseHost,
    config: &Config,
    target: &RunTarget,
) -> Result<Draft> {
    let releases = host
        .list_releases()
        .await
        .map_err(|e| Error::fetch("releases", &e))?;
    let existing = inspect_releases(&releases, &target.branch, config);
    debug!(
        releases = releases.len(),
        previous = existing.previous.as_ref().map(|r| r.tag_name.as_str()),
        draft = existing.draft.as_ref().map(|r| r.id),
        "inspected releases"
    );

    let mut pages = HostPages::new(host, &target.branch, existing.since());
    let history = resolve_history(&mut pages, existing.since()).await?;
    info!(
        pull_requests = history.pull_requests.len(),
        pages = pages.fetched(),
        "resolved merged pull requests"
    );

    let notes = build_release_notes(&history, existing.previous.as_ref(), config)?;
    let action = plan_release(existing.draft.as_ref(), &target.branch, &notes, config);

    Ok(Draft {
        notes,
        action,
        skipped_commits: history.skipped_commits,
    })
}

/// Run with an already-resolved config
///
/// `None` means the repository has no config; the run is skipped without
/// touching the platform.
pub async fn run(
    host: &dyn ReleaseHost,
    config: Option<Config>,
    target: &RunTarget,
    dry_run: bool,
) -> Result<Outcome> {
    let Some(config) = config else {
        info!("no configuration, skipping");
        return Ok(Outcome::Skipped(SkipReason::ConfigNotFound));
    };

    if !config.is_branch_eligible(&target.branch, &target.default_branch) {
        info!(branch = %target.branch, "branch not eligible, skipping");
        return Ok(Outcome::Skipped(SkipReason::BranchNotEligible(
            target.branch.clone(),
        )));
    }

    let draft = prepare_draft(host, &config, target).await?;
    info!(action = %draft.action, "planned release");

    if dry_run {
        return Ok(Outcome::Planned(draft.action));
    }

    let release = execute_release(&draft.action, host).await?;
    Ok(match draft.action {
        ReleaseAction::Create(_) => Outcome::Created(release),
        ReleaseAction::Update { .. } => Outcome::Updated(release),
    })
}

/// Run with the config stored in the repository at `config_path`
pub async fn run_from_repository(
    host: &dyn ReleaseHost,
    target: &RunTarget,
    config_path: &str,
    dry_run: bool,
) -> Result<Outcome> {
    let config = load_config(host, config_path).await?;
    run(host, config, target, dry_run).await
}
