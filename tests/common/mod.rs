//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{HistoryCall, MockReleaseHost, UpdateReleaseCall};

use chrono::{DateTime, TimeZone, Utc};
use release_drafter::pipeline::RunTarget;
use release_drafter::types::{Author, Commit, MergedPullRequest, PlatformConfig, Release};

/// Repository used throughout the tests
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "toolmantim".to_string(),
        repo: "release-drafter-test-project".to_string(),
        host: None,
    }
}

/// Mock host for [`github_config`] with `config` stored in the repository
pub fn host_with_config(config: &str) -> MockReleaseHost {
    let host = MockReleaseHost::with_config(github_config());
    host.set_config_file(config);
    host
}

/// Push to master, the default branch
pub fn master() -> RunTarget {
    RunTarget::new("master", "master")
}

/// A point in time on 2019-06-01, `minute` minutes past noon
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 6, 1, 12, minute, 0).unwrap()
}

/// Merged pull request fixture
pub fn make_pr(number: u64, title: &str, author: &str, labels: &[&str]) -> MergedPullRequest {
    MergedPullRequest {
        number,
        title: title.to_string(),
        author: Author::user(author),
        labels: labels.iter().map(ToString::to_string).collect(),
        merged_at: at(u32::try_from(number % 60).unwrap()),
        body: String::new(),
    }
}

/// Merge commit the platform links to `pr`
pub fn merge_commit(pr: MergedPullRequest, minute: u32) -> Commit {
    Commit {
        sha: format!("merge{}", pr.number),
        message: format!(
            "Merge pull request #{} from {}/branch\n\n{}",
            pr.number,
            pr.author.handle(),
            pr.title
        ),
        author: pr.author.clone(),
        committed_at: at(minute),
        pull_request: Some(MergedPullRequest {
            merged_at: at(minute),
            ..pr
        }),
    }
}

/// Squash commit `<title> (#<number>)`
pub fn squash_commit(number: u64, title: &str, author: &str, minute: u32) -> Commit {
    Commit {
        sha: format!("squash{number}"),
        message: format!("{title} (#{number})\n\n* squashed work"),
        author: Author::user(author),
        committed_at: at(minute),
        pull_request: None,
    }
}

/// Rebased commit referencing `#<number>` in its body
pub fn rebase_commit(number: u64, title: &str, author: &str, minute: u32) -> Commit {
    Commit {
        sha: format!("rebase{number}-{minute}"),
        message: format!("{title}\n\nPart of #{number}"),
        author: Author::user(author),
        committed_at: at(minute),
        pull_request: None,
    }
}

/// Commit that matches no merge strategy
pub fn plain_commit(message: &str, author: Author, minute: u32) -> Commit {
    Commit {
        sha: format!("plain{minute}"),
        message: message.to_string(),
        author,
        committed_at: at(minute),
        pull_request: None,
    }
}

/// The four pull requests of the reference history, newest first
pub fn reference_prs() -> Vec<MergedPullRequest> {
    vec![
        make_pr(4, "Add documentation", "TimonVS", &["documentation"]),
        make_pr(3, "Update dependencies", "TimonVS", &["dependencies"]),
        make_pr(2, "Bug fixes", "TimonVS", &["bug"]),
        make_pr(1, "Add big feature", "TimonVS", &["feature"]),
    ]
}

/// Reference history merged with merge commits
pub fn merge_commit_history() -> Vec<Commit> {
    reference_prs()
        .into_iter()
        .zip([40, 30, 20, 10])
        .map(|(pr, minute)| merge_commit(pr, minute))
        .collect()
}

/// Reference history merged by squashing
pub fn squash_history() -> Vec<Commit> {
    reference_prs()
        .into_iter()
        .zip([40, 30, 20, 10])
        .map(|(pr, minute)| squash_commit(pr.number, &pr.title, "TimonVS", minute))
        .collect()
}

/// Reference history merged by rebasing, two commits per pull request
pub fn rebase_history() -> Vec<Commit> {
    reference_prs()
        .into_iter()
        .zip([40, 30, 20, 10])
        .flat_map(|(pr, minute)| {
            [
                rebase_commit(pr.number, &pr.title, "TimonVS", minute),
                rebase_commit(pr.number, "Address review", "TimonVS", minute - 1),
            ]
        })
        .collect()
}

const RELEASES_URL: &str = "https://github.com/toolmantim/release-drafter-test-project/releases";

/// Published release fixture
pub fn published_release(id: u64, tag: &str, published: DateTime<Utc>) -> Release {
    Release {
        id,
        tag_name: tag.to_string(),
        name: tag.to_string(),
        body: format!("Notes for {tag}"),
        draft: false,
        prerelease: false,
        target_commitish: "master".to_string(),
        created_at: Some(published),
        published_at: Some(published),
        html_url: format!("{RELEASES_URL}/tag/{tag}"),
    }
}

/// Draft release fixture for `branch`
pub fn draft_release(id: u64, branch: &str, body: &str) -> Release {
    Release {
        id,
        tag_name: String::new(),
        name: String::new(),
        body: body.to_string(),
        draft: true,
        prerelease: false,
        target_commitish: branch.to_string(),
        created_at: Some(at(50)),
        published_at: None,
        html_url: format!("{RELEASES_URL}/{id}"),
    }
}
