//! Drafter configuration, read from `.github/release-drafter.toml`
//!
//! Every key is optional; an empty file drafts a flat changelog for the
//! repository's default branch. Keys keep their YAML names
//! (`change-template`, `exclude-labels`, ...), so an existing
//! `release-drafter.yml` converts to TOML key for key.

use crate::changelog::Replacer;
use crate::error::{Error, Result};
use crate::platform::ReleaseHost;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Where the config lives inside the repository
pub const DEFAULT_CONFIG_PATH: &str = ".github/release-drafter.toml";

/// Default body template
pub const DEFAULT_TEMPLATE: &str = "# What's Changed\n\n$CHANGES\n";

/// Default line rendered for each pull request
pub const DEFAULT_CHANGE_TEMPLATE: &str = "* $TITLE (#$NUMBER) @$AUTHOR";

/// Default line rendered when nothing changed
pub const DEFAULT_NO_CHANGES_TEMPLATE: &str = "* No changes";

/// Default version format
pub const DEFAULT_VERSION_TEMPLATE: &str = "$MAJOR.$MINOR.$PATCH";

/// Drafter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Branches whose pushes update the draft (empty: the default branch)
    pub branches: Vec<String>,
    /// Release body template
    pub template: String,
    /// Template for each pull request line
    pub change_template: String,
    /// Emitted in place of `$CHANGES` when nothing changed
    pub no_changes_template: String,
    /// Format of the `$NEXT_*_VERSION` tokens
    pub version_template: String,
    /// Release name for new drafts (empty: left blank)
    pub name_template: String,
    /// Tag name for new drafts (empty: left blank)
    pub tag_template: String,
    /// Sections, in display order
    pub categories: Vec<CategoryConfig>,
    /// Pull requests with any of these labels are left out
    pub exclude_labels: Vec<String>,
    /// When set, only pull requests with one of these labels are listed
    pub include_labels: Vec<String>,
    /// Logins or names never credited in `$CONTRIBUTORS`
    pub exclude_contributors: Vec<String>,
    /// Sort key for pull requests
    pub sort_by: SortBy,
    /// Sort direction for pull requests
    pub sort_direction: SortDirection,
    /// Substitutions applied to every rendered change line
    pub replacers: Vec<ReplacerConfig>,
    /// Label-driven version bumps
    pub version_resolver: VersionResolverConfig,
    /// Count prereleases when looking for the previous release
    pub include_pre_releases: bool,
    /// Only count releases that target the pushed branch
    pub filter_by_commitish: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branches: Vec::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            change_template: DEFAULT_CHANGE_TEMPLATE.to_string(),
            no_changes_template: DEFAULT_NO_CHANGES_TEMPLATE.to_string(),
            version_template: DEFAULT_VERSION_TEMPLATE.to_string(),
            name_template: String::new(),
            tag_template: String::new(),
            categories: Vec::new(),
            exclude_labels: Vec::new(),
            include_labels: Vec::new(),
            exclude_contributors: Vec::new(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            replacers: Vec::new(),
            version_resolver: VersionResolverConfig::default(),
            include_pre_releases: false,
            filter_by_commitish: false,
        }
    }
}

/// A changelog section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Section heading
    pub title: String,
    /// Labels that put a pull request in this section
    #[serde(default)]
    pub labels: Vec<String>,
    /// Shorthand for a single label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CategoryConfig {
    /// Build a category from a title and its labels
    pub fn new(title: &str, labels: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            labels: labels.iter().map(ToString::to_string).collect(),
            label: None,
        }
    }
}

/// Pull request sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Merge time
    #[default]
    #[serde(alias = "merged_at")]
    MergedAt,
    /// Title, in code point order
    Title,
}

/// Pull request sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    /// Oldest / smallest first
    Ascending,
    /// Newest / largest first
    #[default]
    Descending,
}

/// A search/replace rule for change lines
///
/// `search` written as `/pattern/flags` is a regular expression whose
/// replacement may use `$1`-style groups; anything else is literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacerConfig {
    /// Text or `/regex/flags` to look for
    pub search: String,
    /// Replacement text
    #[serde(default)]
    pub replace: String,
}

/// Semver component to bump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    /// x.y.Z
    #[default]
    Patch,
    /// x.Y.0
    Minor,
    /// X.0.0
    Major,
}

/// Labels that trigger one kind of bump
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpLabels {
    /// Label names
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Maps pull request labels to the `$RESOLVED_VERSION` bump
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionResolverConfig {
    /// Labels for a major bump
    pub major: BumpLabels,
    /// Labels for a minor bump
    pub minor: BumpLabels,
    /// Labels for a patch bump
    pub patch: BumpLabels,
    /// Bump used when no label matches
    pub default: Bump,
}

impl VersionResolverConfig {
    /// The bump a single set of labels asks for, if any
    pub fn bump_for(&self, labels: &[String]) -> Option<Bump> {
        let hit = |wanted: &BumpLabels| labels.iter().any(|l| wanted.labels.contains(l));
        if hit(&self.major) {
            Some(Bump::Major)
        } else if hit(&self.minor) {
            Some(Bump::Minor)
        } else if hit(&self.patch) {
            Some(Bump::Patch)
        } else {
            None
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse: {e}")))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Fold `label` shorthands into `labels` and drop duplicate labels
    fn normalize(&mut self) {
        for category in &mut self.categories {
            if let Some(label) = category.label.take()
                && !category.labels.contains(&label)
            {
                category.labels.insert(0, label);
            }
            let mut unique: Vec<String> = Vec::with_capacity(category.labels.len());
            for label in category.labels.drain(..) {
                if !unique.contains(&label) {
                    unique.push(label);
                }
            }
            category.labels = unique;
        }
    }

    fn validate(&self) -> Result<()> {
        for category in &self.categories {
            if category.title.trim().is_empty() {
                return Err(Error::Config("category without a title".to_string()));
            }
        }
        for rule in &self.replacers {
            Replacer::compile(rule)?;
        }
        Ok(())
    }

    /// Whether pushes to `branch` should update the draft
    ///
    /// With no `branches` configured only the default branch qualifies.
    pub fn is_branch_eligible(&self, branch: &str, default_branch: &str) -> bool {
        if self.branches.is_empty() {
            branch == default_branch
        } else {
            self.branches.iter().any(|b| b == branch)
        }
    }
}

/// Load the config from the repository
///
/// Returns `Ok(None)` when the repository has no config file.
pub async fn load_config(host: &dyn ReleaseHost, path: &str) -> Result<Option<Config>> {
    let Some(content) = host
        .fetch_file(path)
        .await
        .map_err(|e| Error::fetch("config", &e))?
    else {
        debug!(path, "no config in repository");
        return Ok(None);
    };

    Config::from_toml_str(&content)
        .map(Some)
        .map_err(|e| Error::Config(format!("{path}: {e}")))
}

/// Load the config from a local file
///
/// Returns `Ok(None)` if the file doesn't exist. YAML files are rejected
/// with a pointer to the TOML location.
pub fn load_local_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
    {
        return Err(Error::Config(format!(
            "{} is YAML; rewrite it as TOML at {DEFAULT_CONFIG_PATH} (keys are unchanged)",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    Config::from_toml_str(&content)
        .map(Some)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}
