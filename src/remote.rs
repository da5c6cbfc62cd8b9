//! Collaborator traits for the remote repository host.
//!
//! The pipeline only talks to the host through these, so tests can swap in
//! mocks or in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RemoteError;
use crate::tags::{Commit, Identity, Tag};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Commits on the main branch strictly after `since`, most recent first.
    ///
    /// The window is exclusive at one-second granularity: a commit made in the
    /// same second as `since` is not returned.
    async fn list_commits_since(&self, since: DateTime<Utc>) -> Result<Vec<Commit>, RemoteError>;

    /// The commit new tags point at.
    async fn latest_commit(&self) -> Result<Commit, RemoteError>;

    async fn commit(&self, sha: &str) -> Result<Commit, RemoteError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagSource: Send + Sync {
    /// All tags, most recent first.
    async fn list_tags(&self) -> Result<Vec<Tag>, RemoteError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagSink: Send + Sync {
    /// Create an annotated tag object and return its sha.
    async fn create_annotated_tag(
        &self,
        name: &str,
        target: &str,
        message: &str,
        tagger: &Identity,
    ) -> Result<String, RemoteError>;

    async fn create_ref(&self, ref_name: &str, target: &str) -> Result<(), RemoteError>;

    async fn delete_ref(&self, ref_name: &str) -> Result<(), RemoteError>;
}
