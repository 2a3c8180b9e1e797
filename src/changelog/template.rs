//! Template expansion for release bodies and change lines
//!
//! Templates use a closed token grammar: `$` followed by upper-case letters,
//! digits or underscores. The longest known token at each `$` is replaced in
//! one left-to-right pass, so text coming from a substitution (a PR title containing `$BODY`,
//! say) is never expanded again. Unknown tokens are copied verbatim.

use super::categorize::CategorizedPullRequests;
use crate::config::{Config, ReplacerConfig};
use crate::error::{Error, Result};
use crate::release::VersionInfo;
use crate::types::{Author, Commit, MergedPullRequest};
use regex::{NoExpand, Regex, RegexBuilder};
use std::collections::{BTreeSet, HashMap};

/// Rendered in `$CONTRIBUTORS` when nobody is credited
pub const NO_CONTRIBUTORS: &str = "No contributors";

/// Expand `$TOKENS` in `template` from `vars`
///
/// At each `$` the longest known token wins, so `$TITLE_$NUMBER` expands
/// both tokens and `$NUMBERS` is the number followed by `S`.
pub fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let run_len = after
            .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(after.len());

        let known = (1..=run_len)
            .rev()
            .find_map(|len| vars.get(&after[..len]).map(|value| (len, value)));
        let consumed = match known {
            Some((len, value)) => {
                out.push_str(value);
                len
            }
            None => {
                out.push('$');
                out.push_str(&after[..run_len]);
                run_len
            }
        };
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// A compiled replacer rule
#[derive(Debug, Clone)]
pub struct Replacer {
    pattern: Regex,
    replace: String,
    expand: bool,
}

impl Replacer {
    /// Compile a rule; `/pattern/flags` searches are regular expressions
    pub fn compile(rule: &ReplacerConfig) -> Result<Self> {
        if let Some((pattern, flags)) = split_regex_literal(&rule.search) {
            let mut builder = RegexBuilder::new(pattern);
            for flag in flags.chars() {
                match flag {
                    'i' => builder.case_insensitive(true),
                    'm' => builder.multi_line(true),
                    's' => builder.dot_matches_new_line(true),
                    'x' => builder.ignore_whitespace(true),
                    // Replacement is always global
                    'g' | 'u' => &mut builder,
                    other => {
                        return Err(Error::Config(format!(
                            "unsupported flag '{other}' in replacer {}",
                            rule.search
                        )));
                    }
                };
            }
            let pattern = builder
                .build()
                .map_err(|e| Error::Config(format!("invalid replacer {}: {e}", rule.search)))?;
            let replace = regex_replacement(&rule.replace, pattern.captures_len() - 1);
            return Ok(Self {
                pattern,
                replace,
                expand: true,
            });
        }

        if rule.search.is_empty() {
            return Err(Error::Config("replacer with an empty search".to_string()));
        }
        let pattern = Regex::new(&regex::escape(&rule.search))
            .map_err(|e| Error::Config(format!("invalid replacer {}: {e}", rule.search)))?;
        Ok(Self {
            pattern,
            replace: rule.replace.clone(),
            expand: false,
        })
    }

    /// Apply the rule to every match in `text`
    pub fn apply(&self, text: &str) -> String {
        if self.expand {
            self.pattern
                .replace_all(text, self.replace.as_str())
                .into_owned()
        } else {
            self.pattern
                .replace_all(text, NoExpand(&self.replace))
                .into_owned()
        }
    }
}

/// Translate `$1`, `$&`, `$<name>` and `$$` references into `regex` syntax
///
/// A reference takes two digits only when that group exists, otherwise one,
/// so `$1a` is group 1 followed by `a`. Anything else after `$` is literal.
fn regex_replacement(replace: &str, groups: usize) -> String {
    let mut out = String::with_capacity(replace.len());
    let mut rest = replace;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits: String = after.chars().take(2).take_while(char::is_ascii_digit).collect();
        let group = |text: &str| text.parse::<usize>().ok().filter(|n| (1..=groups).contains(n));

        let consumed = if after.starts_with('$') {
            out.push_str("$$");
            1
        } else if after.starts_with('&') {
            out.push_str("${0}");
            1
        } else if let Some(n) = group(&digits).filter(|_| digits.len() == 2) {
            out.push_str(&format!("${{{n}}}"));
            2
        } else if let Some(n) = digits.get(..1).and_then(group) {
            out.push_str(&format!("${{{n}}}"));
            1
        } else if let Some(name) = after
            .strip_prefix('<')
            .and_then(|named| named.split_once('>'))
            .map(|(name, _)| name)
            .filter(|name| !name.is_empty())
        {
            out.push_str(&format!("${{{name}}}"));
            name.len() + 2
        } else {
            out.push_str("$$");
            0
        };
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Split `/pattern/flags` into its parts
fn split_regex_literal(search: &str) -> Option<(&str, &str)> {
    let inner = search.strip_prefix('/')?;
    let end = inner.rfind('/')?;
    let (pattern, flags) = (&inner[..end], &inner[end + 1..]);
    (!pattern.is_empty() && flags.chars().all(|c| c.is_ascii_alphabetic()))
        .then_some((pattern, flags))
}

/// Renders pull requests into the `$CHANGES` block
#[derive(Debug, Clone)]
pub struct ChangelogRenderer {
    change_template: String,
    no_changes_template: String,
    replacers: Vec<Replacer>,
}

impl ChangelogRenderer {
    /// Build a renderer, compiling the config's replacers
    pub fn new(config: &Config) -> Result<Self> {
        let replacers = config
            .replacers
            .iter()
            .map(Replacer::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            change_template: config.change_template.clone(),
            no_changes_template: config.no_changes_template.clone(),
            replacers,
        })
    }

    /// Render one pull request line
    pub fn render_change(&self, pr: &MergedPullRequest) -> String {
        // `@$AUTHOR` would produce `@Ada Lovelace` for unlinkable authors
        let template = if pr.author.login.is_none() {
            self.change_template.replace("@$AUTHOR", "$AUTHOR")
        } else {
            self.change_template.clone()
        };

        let vars = HashMap::from([
            ("NUMBER", pr.number.to_string()),
            ("TITLE", pr.title.clone()),
            ("AUTHOR", pr.author.handle().to_string()),
            ("BODY", pr.body.clone()),
        ]);
        let line = substitute(&template, &vars);

        self.replacers
            .iter()
            .fold(line, |line, replacer| replacer.apply(&line))
    }

    fn render_lines(&self, prs: &[MergedPullRequest]) -> String {
        prs.iter()
            .map(|pr| self.render_change(pr))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the full change list, or the no-changes line
    ///
    /// Uncategorized pull requests come first without a heading, then each
    /// category as `## <title>`; sections are separated by a blank line.
    pub fn render_changes(&self, categorized: &CategorizedPullRequests) -> String {
        if categorized.is_empty() {
            return self.no_changes_template.clone();
        }

        let mut sections = Vec::new();
        if !categorized.uncategorized.is_empty() {
            sections.push(self.render_lines(&categorized.uncategorized));
        }
        for category in &categorized.categories {
            sections.push(format!(
                "## {}\n\n{}",
                category.title,
                self.render_lines(&category.pull_requests)
            ));
        }

        sections.join("\n\n").trim().to_string()
    }
}

/// Everything the body template can reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyContext {
    /// Rendered change list
    pub changes: String,
    /// Tag of the bounding release (empty if none)
    pub previous_tag: String,
    /// Contributor sentence
    pub contributors: String,
    /// Distinct contributors credited
    pub contributor_count: usize,
    /// Pull requests listed
    pub change_count: usize,
    /// Non-empty categories
    pub category_count: usize,
    /// Next versions, when the previous tag could be parsed
    pub versions: Option<VersionInfo>,
}

impl BodyContext {
    /// Token values for [`substitute`]
    pub fn variables(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::from([
            ("CHANGES", self.changes.clone()),
            ("PREVIOUS_TAG", self.previous_tag.clone()),
            ("CONTRIBUTORS", self.contributors.clone()),
            ("CONTRIBUTOR_COUNT", self.contributor_count.to_string()),
            ("CHANGE_COUNT", self.change_count.to_string()),
            ("CATEGORY_COUNT", self.category_count.to_string()),
        ]);
        if let Some(ref versions) = self.versions {
            vars.insert("NEXT_MAJOR_VERSION", versions.next_major.clone());
            vars.insert("NEXT_MINOR_VERSION", versions.next_minor.clone());
            vars.insert("NEXT_PATCH_VERSION", versions.next_patch.clone());
            vars.insert("RESOLVED_VERSION", versions.resolved.clone());
        }
        vars
    }

    /// Expand a body, name or tag template
    pub fn render(&self, template: &str) -> String {
        substitute(template, &self.variables())
    }
}

/// Distinct contributors, sorted, as `a, b and c`
///
/// Commit authors and pull request authors both count. Authors with a handle
/// render as `@login`, others by display name. Entries whose login or name
/// is in `exclude` are dropped. Returns the sentence and the count.
pub fn contributors_sentence(
    commits: &[Commit],
    prs: &[&MergedPullRequest],
    exclude: &[String],
) -> (String, usize) {
    let excluded = |name: &str, login: Option<&str>| {
        exclude
            .iter()
            .any(|e| e == name || login.is_some_and(|l| l == e))
    };

    let contributors: BTreeSet<String> = commits
        .iter()
        .map(|c| &c.author)
        .chain(prs.iter().map(|pr| &pr.author))
        .filter(|a| !a.name.is_empty() || a.login.is_some())
        .filter(|a| !excluded(&a.name, a.login.as_deref()))
        .map(Author::mention)
        .collect();

    let names: Vec<String> = contributors.into_iter().collect();
    let sentence = match names.as_slice() {
        [] => NO_CONTRIBUTORS.to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    };
    (sentence, names.len())
}
