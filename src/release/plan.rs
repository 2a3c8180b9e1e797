//! Release planning - pure functions deciding the single write of a run
//!
//! No I/O happens here: the existing draft and the rendered notes are
//! passed in, and the result describes what `execute_release()` should do.

use crate::changelog::ReleaseNotes;
use crate::config::Config;
use crate::types::{NewRelease, Release};
use std::fmt;

/// The one write a run performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseAction {
    /// No draft exists for the branch yet
    Create(NewRelease),
    /// Replace the body of the branch's existing draft
    Update {
        /// Draft release id
        release_id: u64,
        /// Draft tag, for display
        tag_name: String,
        /// New body
        body: String,
        /// Whether the body differs from what the draft holds now
        changed: bool,
    },
}

impl ReleaseAction {
    /// Body the release will carry after the write
    pub fn body(&self) -> &str {
        match self {
            Self::Create(release) => &release.body,
            Self::Update { body, .. } => body,
        }
    }
}

impl fmt::Display for ReleaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(release) => {
                write!(f, "create draft release for {}", release.target_commitish)?;
                if !release.tag_name.is_empty() {
                    write!(f, " ({})", release.tag_name)?;
                }
                Ok(())
            }
            Self::Update {
                release_id,
                tag_name,
                changed,
                ..
            } => {
                write!(f, "update draft release {release_id}")?;
                if !tag_name.is_empty() {
                    write!(f, " ({tag_name})")?;
                }
                if !changed {
                    write!(f, ", body unchanged")?;
                }
                Ok(())
            }
        }
    }
}

/// Decide between creating and updating (PURE)
///
/// An existing draft for the branch is always updated, even when the body
/// is unchanged, so reruns converge on one draft per branch.
pub fn plan_release(
    existing_draft: Option<&Release>,
    branch: &str,
    notes: &ReleaseNotes,
    config: &Config,
) -> ReleaseAction {
    if let Some(draft) = existing_draft {
        return ReleaseAction::Update {
            release_id: draft.id,
            tag_name: draft.tag_name.clone(),
            body: notes.body.clone(),
            changed: draft.body != notes.body,
        };
    }

    let render_optional = |template: &str| {
        if template.is_empty() {
            String::new()
        } else {
            notes.context.render(template)
        }
    };

    ReleaseAction::Create(NewRelease {
        tag_name: render_optional(&config.tag_template),
        name: render_optional(&config.name_template),
        body: notes.body.clone(),
        target_commitish: branch.to_string(),
        draft: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::{BodyContext, CategorizedPullRequests};
    use crate::release::VersionInfo;
    use semver::Version;

    fn notes(body: &str) -> ReleaseNotes {
        ReleaseNotes {
            body: body.to_string(),
            context: BodyContext {
                versions: Some(VersionInfo {
                    previous: Version::new(1, 0, 0),
                    next_major: "2.0.0".to_string(),
                    next_minor: "1.1.0".to_string(),
                    next_patch: "1.0.1".to_string(),
                    resolved: "1.0.1".to_string(),
                }),
                ..BodyContext::default()
            },
            categorized: CategorizedPullRequests::default(),
        }
    }

    fn draft(body: &str) -> Release {
        Release {
            id: 11,
            tag_name: "v1.0.1".to_string(),
            name: "v1.0.1".to_string(),
            body: body.to_string(),
            draft: true,
            prerelease: false,
            target_commitish: "master".to_string(),
            created_at: None,
            published_at: None,
            html_url: String::new(),
        }
    }

    #[test]
    fn test_create_without_draft() {
        let action = plan_release(None, "master", &notes("body"), &Config::default());
        let ReleaseAction::Create(release) = action else {
            panic!("expected create, got {action:?}");
        };
        assert_eq!(release.tag_name, "");
        assert_eq!(release.name, "");
        assert_eq!(release.body, "body");
        assert_eq!(release.target_commitish, "master");
        assert!(release.draft);
    }

    #[test]
    fn test_create_renders_name_and_tag() {
        let config = Config {
            name_template: "Release $RESOLVED_VERSION".to_string(),
            tag_template: "v$RESOLVED_VERSION".to_string(),
            ..Config::default()
        };
        let action = plan_release(None, "master", &notes("body"), &config);
        assert_eq!(
            action,
            ReleaseAction::Create(NewRelease {
                tag_name: "v1.0.1".to_string(),
                name: "Release 1.0.1".to_string(),
                body: "body".to_string(),
                target_commitish: "master".to_string(),
                draft: true,
            })
        );
        assert_eq!(action.to_string(), "create draft release for master (v1.0.1)");
    }

    #[test]
    fn test_update_existing_draft() {
        let existing = draft("old");
        let action = plan_release(Some(&existing), "master", &notes("new"), &Config::default());
        assert_eq!(
            action,
            ReleaseAction::Update {
                release_id: 11,
                tag_name: "v1.0.1".to_string(),
                body: "new".to_string(),
                changed: true,
            }
        );
    }

    #[test]
    fn test_unchanged_body_still_updates() {
        let existing = draft("same");
        let action = plan_release(Some(&existing), "master", &notes("same"), &Config::default());
        assert!(matches!(action, ReleaseAction::Update { changed: false, .. }));
        assert_eq!(action.body(), "same");
        assert_eq!(
            action.to_string(),
            "update draft release 11 (v1.0.1), body unchanged"
        );
    }
}
