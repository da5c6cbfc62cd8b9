//! Tag and commit values, tag resolution and reconciliation.

pub mod reconcile;
pub mod resolver;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reconcile::{MajorPointerAction, TagPlan, compute_next_tag, plan, reconcile_major_pointer};
pub use resolver::{ResolvedTag, find_latest_major_tag, find_latest_version_tag, find_major_tag};

/// A named pointer at a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Sha of the commit the tag points at.
    pub commit: String,
    #[serde(default)]
    pub message: String,
    /// When the tagged state was created. `None` if the listing had no date;
    /// the pipeline then falls back to the target commit's timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: commit.into(),
            message: String::new(),
            created_at: None,
        }
    }

    /// Fully qualified ref name, e.g. `refs/tags/v1.2.3`.
    pub fn ref_name(&self) -> String {
        format!("refs/tags/{}", self.name)
    }
}

/// Who a commit was authored by; reused as the tagger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub author: Option<Identity>,
}
