//! Next tag computation and major-pointer reconciliation.

use tracing::{debug, warn};

use crate::error::VersionError;
use crate::version::{BumpStrategy, VersionFormat, apply_bump};

use super::resolver::{ResolvedTag, find_major_tag};
use super::{Commit, Tag};

/// What to do with the floating major tag (e.g. `v2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MajorPointerAction {
    /// Delete the existing pointer and recreate it, same name, at the new commit.
    Repoint(Tag),
    /// Create a pointer that does not exist yet.
    Create(Tag),
}

impl MajorPointerAction {
    pub fn tag(&self) -> &Tag {
        match self {
            Self::Repoint(tag) | Self::Create(tag) => tag,
        }
    }
}

/// Every tag operation a run intends to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    pub previous: Tag,
    pub strategy: BumpStrategy,
    pub version_tag: Tag,
    pub major: Option<MajorPointerAction>,
}

/// Bump the version of `current` and point the result at `head`.
///
/// A current tag whose name does not parse, or whose bumped component is
/// already at `u64::MAX`, is an error.
pub fn compute_next_tag(
    strategy: BumpStrategy,
    current: &Tag,
    format: &VersionFormat,
    head: &Commit,
) -> Result<Tag, VersionError> {
    let version = format.parse(&current.name)?;
    let next = apply_bump(&version, strategy)?;
    let name = format.format(&next);

    debug!(from = %current.name, to = %name, %strategy, "Computed next version tag");

    Ok(Tag {
        message: format!("Release {}", name),
        name,
        commit: head.sha.clone(),
        created_at: None,
    })
}

/// Decide how the major pointer follows `new_tag`.
///
/// An existing pointer for the new major is repointed, whether it is the
/// latest major tag or listed further down in `tags`. Otherwise a new one is
/// created. Returns `None` when major pointers are disabled.
pub fn reconcile_major_pointer(
    strategy: BumpStrategy,
    new_tag: &Tag,
    current_major: &ResolvedTag,
    tags: &[Tag],
    format: &VersionFormat,
    bind_to_major: bool,
) -> Result<Option<MajorPointerAction>, VersionError> {
    if !bind_to_major {
        return Ok(None);
    }

    let major = format.parse(&new_tag.name)?.major;
    let pointer = Tag {
        name: format.format_major(major),
        commit: new_tag.commit.clone(),
        message: format!("Track {}", new_tag.name),
        created_at: None,
    };

    let latest_matches = current_major.found
        && format.parse_major(&current_major.tag.name) == Some(major);

    if latest_matches {
        return Ok(Some(MajorPointerAction::Repoint(pointer)));
    }

    if let Some(existing) = find_major_tag(tags, format, major) {
        debug!(tag = %existing.name, "Pointer for the new major already exists");
        return Ok(Some(MajorPointerAction::Repoint(pointer)));
    }

    if current_major.found && strategy != BumpStrategy::Major {
        warn!(
            found = %current_major.tag.name,
            expected = %pointer.name,
            "Latest major tag does not match the current major version, creating a new one"
        );
    }

    Ok(Some(MajorPointerAction::Create(pointer)))
}

/// Compute the version tag and major-pointer action for one run.
pub fn plan(
    strategy: BumpStrategy,
    current: &Tag,
    current_major: &ResolvedTag,
    tags: &[Tag],
    format: &VersionFormat,
    head: &Commit,
    bind_to_major: bool,
) -> Result<TagPlan, VersionError> {
    let version_tag = compute_next_tag(strategy, current, format, head)?;
    let major = reconcile_major_pointer(
        strategy,
        &version_tag,
        current_major,
        tags,
        format,
        bind_to_major,
    )?;

    Ok(TagPlan {
        previous: current.clone(),
        strategy,
        version_tag,
        major,
    })
}
