//! Per-strategy extraction of merged pull requests from commits
//!
//! Each merge strategy leaves a different trace on the branch. The rules are
//! kept apart so each can be tested on its own:
//!
//! - merge commit: the platform links the commit to its pull request
//! - squash: one commit whose first line is `<title> (#<n>)`
//! - rebase: every rebased commit references `#<n>` somewhere in its message

use crate::types::{Commit, MergeStrategy, MergedPullRequest};
use regex::Regex;
use std::sync::LazyLock;

static SQUASH_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*\S)\s+\(#(?P<number>\d+)\)$")
        .expect("squash heading regex is valid")
});

static PR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w/&])#(?P<number>\d+)\b").expect("reference regex is valid")
});

/// Which shape a commit has, if any
///
/// Native associations win; a squash heading is tried before a bare
/// reference because squash headings also contain one.
pub fn detect_strategy(commit: &Commit) -> Option<MergeStrategy> {
    if commit.pull_request.is_some() {
        Some(MergeStrategy::MergeCommit)
    } else if parse_squash_heading(commit.heading()).is_some() {
        Some(MergeStrategy::Squash)
    } else if find_reference(&commit.message).is_some() {
        Some(MergeStrategy::Rebase)
    } else {
        None
    }
}

/// Map a commit to the pull request it stands for under `strategy`
pub fn extract(commit: &Commit, strategy: MergeStrategy) -> Option<MergedPullRequest> {
    match strategy {
        MergeStrategy::MergeCommit => extract_merge_commit(commit),
        MergeStrategy::Squash => extract_squash(commit),
        MergeStrategy::Rebase => extract_rebase(commit),
    }
}

fn extract_merge_commit(commit: &Commit) -> Option<MergedPullRequest> {
    commit.pull_request.clone()
}

fn extract_squash(commit: &Commit) -> Option<MergedPullRequest> {
    let (title, number) = parse_squash_heading(commit.heading())?;
    let body = commit
        .message
        .split_once('\n')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default();

    Some(MergedPullRequest {
        number,
        title: title.to_string(),
        author: commit.author.clone(),
        labels: Vec::new(),
        merged_at: commit.committed_at,
        body,
    })
}

fn extract_rebase(commit: &Commit) -> Option<MergedPullRequest> {
    let number = find_reference(&commit.message)?;
    let heading = commit.heading();
    let title = parse_squash_heading(heading).map_or(heading, |(title, _)| title);
    if title.is_empty() {
        return None;
    }

    Some(MergedPullRequest {
        number,
        title: title.to_string(),
        author: commit.author.clone(),
        labels: Vec::new(),
        merged_at: commit.committed_at,
        body: String::new(),
    })
}

/// Split `Title (#12)` into `("Title", 12)`
fn parse_squash_heading(heading: &str) -> Option<(&str, u64)> {
    let caps = SQUASH_HEADING.captures(heading)?;
    let number = caps.name("number")?.as_str().parse().ok()?;
    let title = caps.name("title")?.as_str();
    Some((title, number))
}

/// First `#<n>` reference in a message (`owner/repo#n` and `&#n` don't count)
fn find_reference(message: &str) -> Option<u64> {
    PR_REFERENCE
        .captures_iter(message)
        .find_map(|caps| caps.name("number")?.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Author;
    use chrono::Utc;

    fn commit(message: &str) -> Commit {
        Commit {
            sha: "deadbeef".to_string(),
            message: message.to_string(),
            author: Author::user("TimonVS"),
            committed_at: Utc::now(),
            pull_request: None,
        }
    }

    #[test]
    fn test_squash_heading() {
        let c = commit("Add big feature (#12)\n\n* first\n* second");
        assert_eq!(detect_strategy(&c), Some(MergeStrategy::Squash));

        let pr = extract(&c, MergeStrategy::Squash).unwrap();
        assert_eq!(pr.number, 12);
        assert_eq!(pr.title, "Add big feature");
        assert_eq!(pr.body, "* first\n* second");
        assert_eq!(pr.author.mention(), "@TimonVS");
        assert!(pr.labels.is_empty());
    }

    #[test]
    fn test_squash_requires_suffix_position() {
        assert!(parse_squash_heading("(#12) Add big feature").is_none());
        assert!(parse_squash_heading("(#12)").is_none());
        assert_eq!(
            parse_squash_heading("Fix (parser) edge (#3)"),
            Some(("Fix (parser) edge", 3))
        );
    }

    #[test]
    fn test_rebase_reference_in_body() {
        let c = commit("Update dependencies\n\nPart of #9");
        assert_eq!(detect_strategy(&c), Some(MergeStrategy::Rebase));

        let pr = extract(&c, MergeStrategy::Rebase).unwrap();
        assert_eq!(pr.number, 9);
        assert_eq!(pr.title, "Update dependencies");
    }

    #[test]
    fn test_rebase_ignores_cross_repo_and_entities() {
        assert_eq!(find_reference("see other/repo#4 and &#38; then #7"), Some(7));
        assert_eq!(find_reference("nothing here"), None);
    }

    #[test]
    fn test_plain_commit_has_no_shape() {
        let c = commit("Fix typo in README");
        assert_eq!(detect_strategy(&c), None);
        assert!(extract(&c, MergeStrategy::Squash).is_none());
        assert!(extract(&c, MergeStrategy::Rebase).is_none());
    }

    #[test]
    fn test_native_association_wins() {
        let mut c = commit("Merge pull request #5 from toolmantim/docs");
        let pr = MergedPullRequest {
            number: 5,
            title: "Add documentation".to_string(),
            author: Author::user("TimonVS"),
            labels: vec!["documentation".to_string()],
            merged_at: Utc::now(),
            body: String::new(),
        };
        c.pull_request = Some(pr.clone());

        assert_eq!(detect_strategy(&c), Some(MergeStrategy::MergeCommit));
        assert_eq!(extract(&c, MergeStrategy::MergeCommit), Some(pr));
    }
}
