//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::ReleaseHost;
use crate::types::{
    Author, Commit, HistoryPage, MergedPullRequest, NewRelease, PlatformConfig, Release,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Releases requested per REST page (GitHub's maximum)
const RELEASES_PER_PAGE: usize = 100;

const HISTORY_QUERY: &str = r"
    query findCommitsWithAssociatedPullRequests(
        $name: String!
        $owner: String!
        $branch: String!
        $since: GitTimestamp
        $after: String
    ) {
        repository(name: $name, owner: $owner) {
            ref(qualifiedName: $branch) {
                target {
                    ... on Commit {
                        history(first: 100, since: $since, after: $after) {
                            pageInfo {
                                hasNextPage
                                endCursor
                            }
                            nodes {
                                oid
                                committedDate
                                message
                                author {
                                    name
                                    user {
                                        login
                                    }
                                }
                                associatedPullRequests(first: 5) {
                                    nodes {
                                        number
                                        title
                                        body
                                        merged
                                        mergedAt
                                        author {
                                            login
                                        }
                                        baseRepository {
                                            nameWithOwner
                                        }
                                        labels(first: 100) {
                                            nodes {
                                                name
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

// GraphQL response types for the history query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct HistoryData {
    repository: Option<GraphQlRepository>,
}

#[derive(Deserialize)]
struct GraphQlRepository {
    #[serde(rename = "ref")]
    git_ref: Option<GraphQlRef>,
}

#[derive(Deserialize)]
struct GraphQlRef {
    target: GraphQlTarget,
}

#[derive(Deserialize)]
struct GraphQlTarget {
    history: Option<GraphQlHistory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlHistory {
    page_info: GraphQlPageInfo,
    nodes: Vec<GraphQlCommit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlCommit {
    oid: String,
    committed_date: DateTime<Utc>,
    message: String,
    author: Option<GraphQlGitActor>,
    associated_pull_requests: Option<GraphQlNodes<GraphQlPullRequest>>,
}

#[derive(Deserialize)]
struct GraphQlGitActor {
    name: Option<String>,
    user: Option<GraphQlUser>,
}

#[derive(Deserialize)]
struct GraphQlUser {
    login: String,
}

#[derive(Deserialize)]
struct GraphQlNodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    merged: bool,
    merged_at: Option<DateTime<Utc>>,
    author: Option<GraphQlUser>,
    base_repository: Option<GraphQlRepositoryName>,
    labels: Option<GraphQlNodes<GraphQlLabel>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepositoryName {
    name_with_owner: String,
}

#[derive(Deserialize)]
struct GraphQlLabel {
    name: String,
}

// REST response types

#[derive(Deserialize)]
struct RestRelease {
    id: u64,
    tag_name: String,
    name: Option<String>,
    body: Option<String>,
    draft: bool,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    target_commitish: String,
    created_at: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: String,
}

impl From<RestRelease> for Release {
    fn from(r: RestRelease) -> Self {
        Self {
            id: r.id,
            tag_name: r.tag_name,
            name: r.name.unwrap_or_default(),
            body: r.body.unwrap_or_default(),
            draft: r.draft,
            prerelease: r.prerelease,
            target_commitish: r.target_commitish,
            created_at: r.created_at,
            published_at: r.published_at,
            html_url: r.html_url,
        }
    }
}

#[derive(Deserialize)]
struct RestContent {
    content: Option<String>,
    encoding: Option<String>,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` is a full API base URL (e.g. `https://ghe.example.com/api/v3`);
    /// `None` talks to api.github.com.
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref base_url) = host {
            builder = builder
                .base_uri(base_url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
        })
    }

    fn repo_route(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.config.owner, self.config.repo)
    }
}

/// Pick the merged PR that belongs to this repository, if any
///
/// Forks and other repositories can share commits, so the platform may list
/// PRs from elsewhere.
fn merged_pr_from_graphql(
    prs: Vec<GraphQlPullRequest>,
    full_name: &str,
) -> Option<MergedPullRequest> {
    prs.into_iter()
        .filter(|pr| pr.merged)
        .filter(|pr| {
            pr.base_repository
                .as_ref()
                .is_none_or(|base| base.name_with_owner.eq_ignore_ascii_case(full_name))
        })
        .find_map(|pr| {
            let merged_at = pr.merged_at?;
            let mut labels: Vec<String> = Vec::new();
            for label in pr.labels.map(|l| l.nodes).unwrap_or_default() {
                if !labels.contains(&label.name) {
                    labels.push(label.name);
                }
            }
            Some(MergedPullRequest {
                number: pr.number,
                title: pr.title,
                // Deleted accounts come back without an author
                author: pr
                    .author
                    .map_or_else(|| Author::user("ghost"), |a| Author::user(&a.login)),
                labels,
                merged_at,
                body: pr.body.unwrap_or_default(),
            })
        })
}

fn commit_from_graphql(node: GraphQlCommit, full_name: &str) -> Commit {
    let author = match node.author {
        Some(GraphQlGitActor {
            name,
            user: Some(user),
        }) => Author {
            name: name.unwrap_or_else(|| user.login.clone()),
            login: Some(user.login),
        },
        Some(GraphQlGitActor { name, user: None }) => Author::named(&name.unwrap_or_default()),
        None => Author::named(""),
    };

    Commit {
        sha: node.oid,
        message: node.message,
        author,
        committed_at: node.committed_date,
        pull_request: node
            .associated_pull_requests
            .and_then(|prs| merged_pr_from_graphql(prs.nodes, full_name)),
    }
}

#[async_trait]
impl ReleaseHost for GitHubService {
    async fn fetch_file(&self, path: &str) -> Result<Option<String>> {
        debug!(path, "fetching repository file");
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let route = self.repo_route(&format!("/contents/{}", encoded.join("/")));

        let response: std::result::Result<RestContent, octocrab::Error> =
            self.client.get(&route, None::<&()>).await;

        let content = match response {
            Ok(content) => content,
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                debug!(path, "file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let raw = content
            .content
            .ok_or_else(|| Error::GitHubApi(format!("{path} has no content (is it a file?)")))?;

        if content.encoding.as_deref().is_some_and(|e| e != "base64") {
            return Err(Error::GitHubApi(format!(
                "unsupported content encoding for {path}"
            )));
        }

        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| Error::GitHubApi(format!("failed to decode {path}: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::GitHubApi(format!("{path} is not UTF-8: {e}")))?;

        debug!(path, bytes = text.len(), "fetched repository file");
        Ok(Some(text))
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        debug!("listing releases");
        let route = self.repo_route("/releases");
        let mut releases = Vec::new();

        for page in 1u32.. {
            let params = serde_json::json!({
                "per_page": RELEASES_PER_PAGE,
                "page": page,
            });
            let batch: Vec<RestRelease> = self.client.get(&route, Some(&params)).await?;
            let count = batch.len();
            releases.extend(batch.into_iter().map(Release::from));

            if count < RELEASES_PER_PAGE {
                break;
            }
        }

        debug!(count = releases.len(), "listed releases");
        Ok(releases)
    }

    async fn history_page(
        &self,
        branch: &str,
        since: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        debug!(branch, ?since, cursor, "fetching history page");

        let response: GraphQlResponse<HistoryData> = self
            .client
            .graphql(&serde_json::json!({
                "query": HISTORY_QUERY,
                "variables": {
                    "owner": self.config.owner,
                    "name": self.config.repo,
                    "branch": format!("refs/heads/{branch}"),
                    "since": since.map(|s| s.to_rfc3339()),
                    "after": cursor,
                }
            }))
            .await
            .map_err(|e| Error::GitHubApi(format!("history query failed: {e}")))?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let history = response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| Error::GitHubApi("repository not found".to_string()))?
            .git_ref
            .ok_or_else(|| Error::GitHubApi(format!("branch {branch} not found")))?
            .target
            .history
            .ok_or_else(|| Error::GitHubApi(format!("{branch} does not point at a commit")))?;

        let full_name = self.config.full_name();
        let commits: Vec<Commit> = history
            .nodes
            .into_iter()
            .map(|node| commit_from_graphql(node, &full_name))
            .collect();

        debug!(
            count = commits.len(),
            has_next_page = history.page_info.has_next_page,
            "fetched history page"
        );
        Ok(HistoryPage {
            commits,
            has_next_page: history.page_info.has_next_page,
            end_cursor: history.page_info.end_cursor,
        })
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        debug!(
            tag_name = %release.tag_name,
            target = %release.target_commitish,
            draft = release.draft,
            "creating release"
        );
        let created: RestRelease = self
            .client
            .post(self.repo_route("/releases"), Some(release))
            .await?;

        let result = Release::from(created);
        debug!(release_id = result.id, "created release");
        Ok(result)
    }

    async fn update_release(&self, release_id: u64, body: &str) -> Result<Release> {
        debug!(release_id, "updating release body");
        let updated: RestRelease = self
            .client
            .patch(
                self.repo_route(&format!("/releases/{release_id}")),
                Some(&serde_json::json!({ "body": body })),
            )
            .await?;

        debug!(release_id, "updated release body");
        Ok(updated.into())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
