//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use autotag::config::DEFAULT_API_URL;
use autotag::error::RemoteError;
use autotag::remote::{CommitSource, TagSink, TagSource};
use autotag::{BumpStrategy, Commit, Config, Identity, Tag, VersionFormat};

/// A recorded mutation against the fake remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    CreateTag { name: String, target: String },
    CreateRef { ref_name: String, target: String },
    DeleteRef(String),
}

/// In-memory repository host.
///
/// Tags and commits are kept most recent first, like the GitHub API returns
/// them. Created refs are prepended to the tag list so a second run sees them.
pub struct FakeRemote {
    pub head: Commit,
    pub commits: Vec<Commit>,
    tags: Mutex<Vec<Tag>>,
    objects: Mutex<HashMap<String, String>>,
    ops: Mutex<Vec<Op>>,
    fail_on: Option<&'static str>,
}

impl FakeRemote {
    /// `commits` most recent first; the first one is HEAD.
    pub fn new(commits: Vec<Commit>, tags: Vec<Tag>) -> Self {
        let head = commits.first().cloned().unwrap_or_else(|| commit("head", "init", 0));
        Self {
            head,
            commits,
            tags: Mutex::new(tags),
            objects: Mutex::new(HashMap::new()),
            ops: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Make the named operation ("create_tag", "create_ref", "delete_ref",
    /// "list_tags", "list_commits") fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.lock().unwrap().iter().map(|t| t.name.clone()).collect()
    }

    pub fn tag(&self, name: &str) -> Option<Tag> {
        self.tags.lock().unwrap().iter().find(|t| t.name == name).cloned()
    }

    fn check(&self, operation: &'static str) -> Result<(), RemoteError> {
        if self.fail_on == Some(operation) {
            return Err(RemoteError::Failed {
                operation,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CommitSource for FakeRemote {
    async fn list_commits_since(&self, since: DateTime<Utc>) -> Result<Vec<Commit>, RemoteError> {
        self.check("list_commits")?;
        Ok(self
            .commits
            .iter()
            .filter(|c| c.timestamp > since)
            .cloned()
            .collect())
    }

    async fn latest_commit(&self) -> Result<Commit, RemoteError> {
        Ok(self.head.clone())
    }

    async fn commit(&self, sha: &str) -> Result<Commit, RemoteError> {
        self.commits
            .iter()
            .find(|c| c.sha == sha)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                operation: "get commit",
                resource: sha.to_string(),
            })
    }
}

#[async_trait]
impl TagSource for FakeRemote {
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        self.check("list_tags")?;
        Ok(self.tags.lock().unwrap().clone())
    }
}

#[async_trait]
impl TagSink for FakeRemote {
    async fn create_annotated_tag(
        &self,
        name: &str,
        target: &str,
        _message: &str,
        _tagger: &Identity,
    ) -> Result<String, RemoteError> {
        self.check("create_tag")?;
        let object = format!("tagobj-{}", name);
        self.objects
            .lock()
            .unwrap()
            .insert(object.clone(), target.to_string());
        self.ops.lock().unwrap().push(Op::CreateTag {
            name: name.to_string(),
            target: target.to_string(),
        });
        Ok(object)
    }

    async fn create_ref(&self, ref_name: &str, target: &str) -> Result<(), RemoteError> {
        self.check("create_ref")?;
        let name = ref_name.strip_prefix("refs/tags/").unwrap_or(ref_name);
        let commit = self
            .objects
            .lock()
            .unwrap()
            .get(target)
            .cloned()
            .unwrap_or_else(|| target.to_string());

        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.name == name) {
            return Err(RemoteError::Failed {
                operation: "create ref",
                message: format!("Reference already exists: {}", ref_name),
            });
        }
        tags.insert(0, Tag::new(name, commit));
        self.ops.lock().unwrap().push(Op::CreateRef {
            ref_name: ref_name.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    async fn delete_ref(&self, ref_name: &str) -> Result<(), RemoteError> {
        self.check("delete_ref")?;
        let name = ref_name.strip_prefix("refs/tags/").unwrap_or(ref_name);
        self.tags.lock().unwrap().retain(|t| t.name != name);
        self.ops
            .lock()
            .unwrap()
            .push(Op::DeleteRef(ref_name.to_string()));
        Ok(())
    }
}

/// Base timestamp for fake history; `minutes` offsets from it.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn commit(sha: &str, message: &str, minutes: i64) -> Commit {
    Commit {
        sha: sha.to_string(),
        message: message.to_string(),
        timestamp: at(minutes),
        author: Some(Identity {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        }),
    }
}

/// A tag listed without a date, like the GitHub tags endpoint returns.
pub fn tag(name: &str, commit_sha: &str) -> Tag {
    Tag::new(name, commit_sha)
}

/// Configuration for a run on `main` with the `v` prefix.
pub fn test_config(default: BumpStrategy, bind_to_major: bool, dry_run: bool) -> Config {
    Config {
        token: "test-token".to_string(),
        repository: "owner/repo".parse().unwrap(),
        main_branch: "main".to_string(),
        current_branch: Some("main".to_string()),
        head_sha: None,
        bump_strategy: default,
        format: VersionFormat::default(),
        dry_run,
        bind_to_major,
        api_url: DEFAULT_API_URL.to_string(),
    }
}
