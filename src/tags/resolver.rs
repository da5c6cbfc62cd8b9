//! Latest version tag and major-pointer tag detection.
//!
//! Both scans walk the tag list in the order the remote returned it (most
//! recent first) and stop at the first match.

use chrono::Utc;
use tracing::debug;

use crate::version::{BumpStrategy, VersionFormat};

use super::{Commit, Tag};

/// Outcome of a tag scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub tag: Tag,
    /// `false` when no matching tag exists and `tag` is a synthetic stand-in
    /// pointing at HEAD.
    pub found: bool,
}

impl ResolvedTag {
    /// The default strategy to use after this resolution.
    ///
    /// A repository without any version tag gets at least a patch release so
    /// the first run always produces `0.0.1`.
    pub fn default_strategy(&self, configured: BumpStrategy) -> BumpStrategy {
        if self.found {
            configured
        } else {
            BumpStrategy::Patch
        }
    }
}

/// Find the most recent tag named `prefix + X.Y.Z + suffix`.
///
/// Falls back to a synthetic `prefix + 0.0.0 + suffix` tag at `head`.
pub fn find_latest_version_tag(tags: &[Tag], format: &VersionFormat, head: &Commit) -> ResolvedTag {
    match tags.iter().find(|t| format.is_version_tag(&t.name)) {
        Some(tag) => {
            debug!(tag = %tag.name, "Found latest version tag");
            ResolvedTag {
                tag: tag.clone(),
                found: true,
            }
        }
        None => {
            debug!("No version tag found, starting from 0.0.0");
            ResolvedTag {
                tag: synthetic(format.format(&semver::Version::new(0, 0, 0)), head),
                found: false,
            }
        }
    }
}

/// Find the most recent tag named `prefix + N + suffix`.
///
/// Falls back to a synthetic `prefix + 0 + suffix` tag at `head`.
pub fn find_latest_major_tag(tags: &[Tag], format: &VersionFormat, head: &Commit) -> ResolvedTag {
    let found = tags
        .iter()
        .find(|t| !format.is_version_tag(&t.name) && format.parse_major(&t.name).is_some());

    match found {
        Some(tag) => {
            debug!(tag = %tag.name, "Found latest major tag");
            ResolvedTag {
                tag: tag.clone(),
                found: true,
            }
        }
        None => {
            debug!("No major tag found");
            ResolvedTag {
                tag: synthetic(format.format_major(0), head),
                found: false,
            }
        }
    }
}

/// Find the pointer tag for a specific major version (`prefix + major + suffix`).
pub fn find_major_tag<'a>(tags: &'a [Tag], format: &VersionFormat, major: u64) -> Option<&'a Tag> {
    let name = format.format_major(major);
    tags.iter().find(|t| t.name == name)
}

fn synthetic(name: String, head: &Commit) -> Tag {
    Tag {
        name,
        commit: head.sha.clone(),
        message: String::new(),
        created_at: Some(Utc::now()),
    }
}
