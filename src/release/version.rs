//! Next-version tokens derived from the previous release tag

use crate::changelog::substitute;
use crate::config::{Bump, Config};
use crate::types::MergedPullRequest;
use regex::Regex;
use semver::Version;
use std::collections::HashMap;
use std::sync::LazyLock;

static VERSION_IN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("version regex is valid")
});

/// Candidate next versions, formatted with `version-template`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version parsed from the previous tag (`0.0.0` without one)
    pub previous: Version,
    /// `$NEXT_MAJOR_VERSION`
    pub next_major: String,
    /// `$NEXT_MINOR_VERSION`
    pub next_minor: String,
    /// `$NEXT_PATCH_VERSION`
    pub next_patch: String,
    /// `$RESOLVED_VERSION`: the bump the listed pull requests ask for
    pub resolved: String,
}

/// Loosely read a version out of a tag: `v1.2` becomes `1.2.0`
pub fn coerce_version(tag: &str) -> Option<Version> {
    let caps = VERSION_IN_TAG.captures(tag)?;
    let part = |i: usize| -> Option<u64> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Apply a bump, or `None` if the bumped component would overflow
pub fn bump_version(version: &Version, bump: Bump) -> Option<Version> {
    Some(match bump {
        Bump::Major => Version::new(version.major.checked_add(1)?, 0, 0),
        Bump::Minor => Version::new(version.major, version.minor.checked_add(1)?, 0),
        Bump::Patch => Version::new(version.major, version.minor, version.patch.checked_add(1)?),
    })
}

fn format_version(template: &str, version: &Version) -> String {
    let vars = HashMap::from([
        ("MAJOR", version.major.to_string()),
        ("MINOR", version.minor.to_string()),
        ("PATCH", version.patch.to_string()),
        ("COMPLETE", version.to_string()),
    ]);
    substitute(template, &vars)
}

/// Compute the version tokens
///
/// Without a previous tag versions start from `0.0.0`. A tag with no
/// recognisable version, or one that cannot be bumped, yields `None`,
/// leaving the tokens unresolved.
pub fn resolve_versions(
    previous_tag: Option<&str>,
    prs: &[&MergedPullRequest],
    config: &Config,
) -> Option<VersionInfo> {
    let previous = match previous_tag.filter(|t| !t.is_empty()) {
        Some(tag) => coerce_version(tag)?,
        None => Version::new(0, 0, 0),
    };

    let bump = prs
        .iter()
        .filter_map(|pr| config.version_resolver.bump_for(&pr.labels))
        .max()
        .unwrap_or(config.version_resolver.default);

    let template = &config.version_template;
    let next = |bump| bump_version(&previous, bump).map(|v| format_version(template, &v));
    Some(VersionInfo {
        next_major: next(Bump::Major)?,
        next_minor: next(Bump::Minor)?,
        next_patch: next(Bump::Patch)?,
        resolved: next(bump)?,
        previous,
    })
}
