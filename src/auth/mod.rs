//! Authentication for GitHub
//!
//! Tokens come from a flag, environment variables, or the `gh` CLI.

use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line
    Flag,
    /// Token from environment variable
    EnvVar,
    /// Token from the `gh` CLI
    Cli,
}

/// A token and where it came from
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick a token from the flag or the environment, without spawning anything
pub fn token_from_env(
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<GitHubAuthConfig> {
    if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
        return Some(GitHubAuthConfig {
            token: token.trim().to_string(),
            source: AuthSource::Flag,
        });
    }

    TOKEN_ENV_VARS.iter().find_map(|var| {
        lookup(var)
            .filter(|t| !t.trim().is_empty())
            .map(|token| GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            })
    })
}

/// Resolve a GitHub token
///
/// Order: `explicit`, `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(explicit: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(auth) = token_from_env(explicit, |var| std::env::var(var).ok()) {
        debug!(source = ?auth.source, "using GitHub token");
        return Ok(auth);
    }

    debug!("no token in environment, asking gh");
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token set and gh is unavailable: {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token set; pass --token, set GITHUB_TOKEN, or run `gh auth login`".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("gh returned an empty token".to_string()));
    }

    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}
