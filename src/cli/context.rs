//! Shared setup for commands that talk to GitHub

use release_drafter::auth::get_github_auth;
use release_drafter::error::Result;
use release_drafter::event::{PushEvent, effective_branch};
use release_drafter::pipeline::RunTarget;
use release_drafter::platform::GitHubService;
use std::path::Path;
use tracing::debug;

/// Everything a run needs before it can talk to the platform
///
/// - Reading the push payload
/// - Working out the target branch
/// - Resolving a token and building the GitHub client
pub struct CommandContext {
    /// Parsed push payload
    pub event: PushEvent,
    /// Branch and default branch for the run
    pub target: RunTarget,
    /// GitHub client for the pushed repository
    pub host: GitHubService,
}

impl CommandContext {
    /// Build the context from the payload at `event_path`
    pub async fn new(
        event_path: &Path,
        override_ref: Option<&str>,
        token: Option<&str>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let event = PushEvent::from_path(event_path)?;
        let target = RunTarget::new(
            effective_branch(&event.git_ref, override_ref),
            event.default_branch(),
        );

        let platform = event.platform_config(api_url)?;
        let auth = get_github_auth(token).await?;
        debug!(repo = %platform.full_name(), source = ?auth.source, "authenticated");

        let host = GitHubService::new(&auth.token, platform.owner, platform.repo, platform.host)?;

        Ok(Self {
            event,
            target,
            host,
        })
    }
}
