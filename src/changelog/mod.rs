//! Changelog building: categorize resolved pull requests and render the body
//!
//! Pure, like the merge planner it sits beside: all data comes in as
//! arguments and nothing here touches the network.

mod categorize;
mod template;

pub use categorize::{
    CategorizedPullRequests, CategoryGroup, categorize, compare_pull_requests, is_excluded,
    sort_pull_requests,
};
pub use template::{
    BodyContext, ChangelogRenderer, NO_CONTRIBUTORS, Replacer, contributors_sentence, substitute,
};

use crate::config::Config;
use crate::error::Result;
use crate::history::ResolvedHistory;
use crate::release::resolve_versions;
use crate::types::{MergedPullRequest, Release};
use tracing::warn;

/// Rendered release notes plus the values they were rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    /// Final release body
    pub body: String,
    /// Token values, reused for the name and tag templates
    pub context: BodyContext,
    /// Pull requests listed, in render order
    pub categorized: CategorizedPullRequests,
}

/// Build release notes for the resolved history
///
/// `previous` is the release bounding the history window, if any.
pub fn build_release_notes(
    history: &ResolvedHistory,
    previous: Option<&Release>,
    config: &Config,
) -> Result<ReleaseNotes> {
    let renderer = ChangelogRenderer::new(config)?;
    let categorized = categorize(&history.pull_requests, config);
    let listed: Vec<&MergedPullRequest> = categorized.iter().collect();

    let (contributors, contributor_count) =
        contributors_sentence(&history.commits, &listed, &config.exclude_contributors);

    let previous_tag = previous.map(|r| r.tag_name.as_str());
    let versions = resolve_versions(previous_tag, &listed, config);
    if versions.is_none() {
        warn!(
            tag = previous_tag.unwrap_or_default(),
            "previous tag is not a bumpable version, version tokens left unresolved"
        );
    }

    let context = BodyContext {
        changes: renderer.render_changes(&categorized),
        previous_tag: previous_tag.unwrap_or_default().to_string(),
        contributors,
        contributor_count,
        change_count: listed.len(),
        category_count: categorized.categories.len(),
        versions,
    };

    Ok(ReleaseNotes {
        body: context.render(&config.template),
        context,
        categorized,
    })
}
