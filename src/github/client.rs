//! GitHub REST implementation of the remote collaborator traits via octocrab.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::RemoteError;
use crate::remote::{CommitSource, TagSink, TagSource};
use crate::tags::{Commit, Identity, Tag};

use super::RepositoryId;

const PER_PAGE: u8 = 100;

/// Safety limit to prevent infinite pagination loops.
const MAX_PAGES: u32 = 50;

/// A GitHub repository, scoped to the branch being tagged.
pub struct GitHubRepo {
    client: Octocrab,
    repository: RepositoryId,
    branch: String,
    /// Sha (or ref) new tags point at.
    head_ref: String,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct CommitListParams<'a> {
    sha: &'a str,
    since: String,
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct ApiTag {
    name: String,
    commit: ApiTagCommit,
}

#[derive(Deserialize)]
struct ApiTagCommit {
    sha: String,
}

#[derive(Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
}

#[derive(Deserialize)]
struct ApiCommitDetail {
    message: String,
    author: Option<ApiSignature>,
    committer: Option<ApiSignature>,
}

#[derive(Deserialize)]
struct ApiSignature {
    name: String,
    email: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CreateTagBody<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    tagger: TaggerBody<'a>,
}

#[derive(Serialize)]
struct TaggerBody<'a> {
    name: &'a str,
    email: &'a str,
    date: String,
}

#[derive(Deserialize)]
struct ApiTagObject {
    sha: String,
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    ref_name: &'a str,
    sha: &'a str,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

impl From<ApiCommit> for Commit {
    fn from(api: ApiCommit) -> Self {
        let detail = api.commit;
        let timestamp = detail
            .committer
            .as_ref()
            .and_then(|s| s.date)
            .or_else(|| detail.author.as_ref().and_then(|s| s.date))
            .unwrap_or_else(Utc::now);

        Commit {
            sha: api.sha,
            message: detail.message,
            timestamp,
            author: detail.author.map(|s| Identity {
                name: s.name,
                email: s.email,
            }),
        }
    }
}

impl GitHubRepo {
    /// Build an authenticated client from the run configuration.
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_url.as_str())
            .and_then(|builder| builder.build())
            .map_err(|e| RemoteError::Request {
                operation: "build GitHub client",
                source: Box::new(e),
            })?;

        let head_ref = config
            .head_sha
            .clone()
            .unwrap_or_else(|| config.main_branch.clone());

        Ok(Self::with_client(
            client,
            config.repository.clone(),
            &config.main_branch,
            head_ref,
        ))
    }

    /// Use a pre-configured octocrab client (e.g. pointed at a mock server).
    pub fn with_client(
        client: Octocrab,
        repository: RepositoryId,
        branch: &str,
        head_ref: impl Into<String>,
    ) -> Self {
        Self {
            client,
            repository,
            branch: branch.to_string(),
            head_ref: head_ref.into(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}/{}",
            self.repository.owner, self.repository.name, path
        )
    }
}

/// Map an octocrab failure to a `RemoteError`.
///
/// Checks both Display and Debug output since octocrab surfaces GitHub's
/// error message in different places depending on the failure.
fn classify(operation: &'static str, resource: &str, e: octocrab::Error) -> RemoteError {
    let display = e.to_string();
    let debug = format!("{:?}", e);

    if display.to_lowercase().contains("rate limit") || debug.to_lowercase().contains("rate limit") {
        return RemoteError::RateLimited { operation };
    }
    if display.contains("Not Found") || debug.contains("Not Found") {
        return RemoteError::NotFound {
            operation,
            resource: resource.to_string(),
        };
    }
    RemoteError::Request {
        operation,
        source: Box::new(e),
    }
}

#[async_trait]
impl CommitSource for GitHubRepo {
    async fn list_commits_since(&self, since: DateTime<Utc>) -> Result<Vec<Commit>, RemoteError> {
        // The API's `since` is inclusive; the tagged commit itself must not count.
        let since = (since + Duration::seconds(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
        let route = self.route("commits");
        let mut commits = Vec::new();
        let mut page = 1u32;

        loop {
            let params = CommitListParams {
                sha: &self.branch,
                since: since.clone(),
                per_page: PER_PAGE,
                page,
            };
            let items: Vec<ApiCommit> = self
                .client
                .get(&route, Some(&params))
                .await
                .map_err(|e| classify("list commits", &route, e))?;

            let count = items.len();
            commits.extend(items.into_iter().map(Commit::from));

            if count < PER_PAGE as usize {
                break;
            }
            page += 1;
            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while listing commits for {}",
                    MAX_PAGES, self.repository
                );
                break;
            }
        }

        debug!(count = commits.len(), %since, "Listed commits");
        Ok(commits)
    }

    async fn latest_commit(&self) -> Result<Commit, RemoteError> {
        self.commit(&self.head_ref).await
    }

    async fn commit(&self, sha: &str) -> Result<Commit, RemoteError> {
        let route = self.route(&format!("commits/{}", sha));
        let commit: ApiCommit = self
            .client
            .get(&route, None::<&()>)
            .await
            .map_err(|e| classify("get commit", sha, e))?;
        Ok(commit.into())
    }
}

#[async_trait]
impl TagSource for GitHubRepo {
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        let route = self.route("tags");
        let mut tags = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let items: Vec<ApiTag> = self
                .client
                .get(&route, Some(&params))
                .await
                .map_err(|e| classify("list tags", &route, e))?;

            let count = items.len();
            tags.extend(items.into_iter().map(|t| Tag::new(t.name, t.commit.sha)));

            if count < PER_PAGE as usize {
                break;
            }
            page += 1;
            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while listing tags for {}",
                    MAX_PAGES, self.repository
                );
                break;
            }
        }

        debug!(count = tags.len(), "Listed tags");
        Ok(tags)
    }
}

#[async_trait]
impl TagSink for GitHubRepo {
    async fn create_annotated_tag(
        &self,
        name: &str,
        target: &str,
        message: &str,
        tagger: &Identity,
    ) -> Result<String, RemoteError> {
        let body = CreateTagBody {
            tag: name,
            message,
            object: target,
            kind: "commit",
            tagger: TaggerBody {
                name: &tagger.name,
                email: &tagger.email,
                date: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            },
        };

        let created: ApiTagObject = self
            .client
            .post(self.route("git/tags"), Some(&body))
            .await
            .map_err(|e| classify("create tag object", name, e))?;

        debug!(tag = name, sha = %created.sha, "Created tag object");
        Ok(created.sha)
    }

    async fn create_ref(&self, ref_name: &str, target: &str) -> Result<(), RemoteError> {
        let body = CreateRefBody {
            ref_name,
            sha: target,
        };

        let created: ApiRef = self
            .client
            .post(self.route("git/refs"), Some(&body))
            .await
            .map_err(|e| classify("create ref", ref_name, e))?;

        debug!(reference = %created.ref_name, target, "Created ref");
        Ok(())
    }

    async fn delete_ref(&self, ref_name: &str) -> Result<(), RemoteError> {
        let tag = ref_name.strip_prefix("refs/tags/").unwrap_or(ref_name);

        self.client
            .repos(&self.repository.owner, &self.repository.name)
            .delete_ref(&Reference::Tag(tag.to_string()))
            .await
            .map_err(|e| classify("delete ref", ref_name, e))?;

        debug!(reference = ref_name, "Deleted ref");
        Ok(())
    }
}
