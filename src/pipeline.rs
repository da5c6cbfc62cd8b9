//! Tagging pipeline: resolve the current tag, pick a strategy, bump, and apply.
//!
//! A run moves through branch check → tag resolution → strategy selection →
//! either a skip exit or version bump + major reconciliation. Nothing is
//! retried; the first remote failure aborts the run.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AutoTagError, RemoteError};
use crate::remote::{CommitSource, TagSink, TagSource};
use crate::tags::{
    Identity, MajorPointerAction, Tag, TagPlan, find_latest_major_tag, find_latest_version_tag,
    plan,
};
use crate::version::{BumpStrategy, select_strategy};

/// Tagger used when the latest commit carries no author.
pub const FALLBACK_TAGGER_NAME: &str = "github-actions[bot]";
pub const FALLBACK_TAGGER_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run was not triggered from the main branch; nothing was done.
    NotMainBranch {
        current: Option<String>,
        main: String,
    },
    /// A `[#skip]` marker (or a skip default) suppressed the release.
    Skipped { previous: Tag },
    /// Tags were computed, and applied unless `dry_run` is set.
    Tagged { plan: TagPlan, dry_run: bool },
}

/// What the read-only half of a run decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip { previous: Tag },
    Release { plan: TagPlan, tagger: Identity },
}

/// Execute one tagging run against `remote`.
pub async fn run<R>(config: &Config, remote: &R) -> Result<RunOutcome, AutoTagError>
where
    R: CommitSource + TagSource + TagSink,
{
    if !config.is_main_branch() {
        info!(
            current = ?config.current_branch,
            main = %config.main_branch,
            "Not running from the main branch"
        );
        return Ok(RunOutcome::NotMainBranch {
            current: config.current_branch.clone(),
            main: config.main_branch.clone(),
        });
    }

    if config.dry_run {
        info!("Running in dry-run mode");
    }

    match decide(config, remote).await? {
        Decision::Skip { previous } => {
            info!(previous = %previous.name, "No need to create a new tag, skipping");
            Ok(RunOutcome::Skipped { previous })
        }
        Decision::Release { plan, tagger } => {
            apply_plan(&plan, &tagger, remote, config.dry_run).await?;
            Ok(RunOutcome::Tagged {
                plan,
                dry_run: config.dry_run,
            })
        }
    }
}

/// Read remote state and compute the tag plan without mutating anything.
pub async fn decide<R>(config: &Config, remote: &R) -> Result<Decision, AutoTagError>
where
    R: CommitSource + TagSource + ?Sized,
{
    let head = remote.latest_commit().await?;
    let tags = remote.list_tags().await?;

    let current = find_latest_version_tag(&tags, &config.format, &head);
    info!(tag = %current.tag.name, found = current.found, "Previous tag version");

    let since = match current.tag.created_at {
        Some(created_at) => created_at,
        None => remote.commit(&current.tag.commit).await?.timestamp,
    };
    let commits = remote.list_commits_since(since).await?;
    debug!(count = commits.len(), %since, "Commits since previous tag");

    let strategy = select_strategy(&commits, current.default_strategy(config.bump_strategy));
    info!(%strategy, "Selected bump strategy");

    if strategy == BumpStrategy::Skip {
        return Ok(Decision::Skip {
            previous: current.tag,
        });
    }

    let current_major = find_latest_major_tag(&tags, &config.format, &head);
    let plan = plan(
        strategy,
        &current.tag,
        &current_major,
        &tags,
        &config.format,
        &head,
        config.bind_to_major,
    )?;

    let tagger = head.author.clone().unwrap_or_else(|| Identity {
        name: FALLBACK_TAGGER_NAME.to_string(),
        email: FALLBACK_TAGGER_EMAIL.to_string(),
    });

    Ok(Decision::Release { plan, tagger })
}

/// Perform the plan's tag operations, in order: version tag, then major pointer.
///
/// With `dry_run` every operation is only logged.
pub async fn apply_plan<S>(
    plan: &TagPlan,
    tagger: &Identity,
    sink: &S,
    dry_run: bool,
) -> Result<(), RemoteError>
where
    S: TagSink + ?Sized,
{
    info!(tag = %plan.version_tag.name, commit = %plan.version_tag.commit, "Creating new tag version");
    create_tag(&plan.version_tag, tagger, sink, dry_run).await?;

    match &plan.major {
        None => {}
        Some(MajorPointerAction::Repoint(tag)) => {
            info!(tag = %tag.name, commit = %tag.commit, "Binding major tag to latest commit");
            if dry_run {
                info!(reference = %tag.ref_name(), "[dry-run] Would delete ref");
            } else {
                sink.delete_ref(&tag.ref_name()).await?;
            }
            create_tag(tag, tagger, sink, dry_run).await?;
        }
        Some(MajorPointerAction::Create(tag)) => {
            info!(tag = %tag.name, commit = %tag.commit, "Creating new major tag");
            create_tag(tag, tagger, sink, dry_run).await?;
        }
    }

    Ok(())
}

/// Create the annotated tag object and the ref pointing at it.
async fn create_tag<S>(tag: &Tag, tagger: &Identity, sink: &S, dry_run: bool) -> Result<(), RemoteError>
where
    S: TagSink + ?Sized,
{
    if dry_run {
        info!(tag = %tag.name, commit = %tag.commit, "[dry-run] Would create tag");
        return Ok(());
    }

    let object = sink
        .create_annotated_tag(&tag.name, &tag.commit, &tag.message, tagger)
        .await?;
    sink.create_ref(&tag.ref_name(), &object).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockTagSink;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn tagger() -> Identity {
        Identity {
            name: "Dev".to_string(),
            email: "dev@example.com".to_string(),
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.to_string(),
            commit: "head123".to_string(),
            message: format!("Release {}", name),
            created_at: None,
        }
    }

    fn plan_with(major: Option<MajorPointerAction>) -> TagPlan {
        TagPlan {
            previous: Tag::new("v1.4.2", "old456"),
            strategy: BumpStrategy::Patch,
            version_tag: tag("v1.4.3"),
            major,
        }
    }

    #[tokio::test]
    async fn test_version_tag_ref_points_at_tag_object() {
        let mut sink = MockTagSink::new();
        let mut seq = Sequence::new();

        sink.expect_create_annotated_tag()
            .withf(|name, target, _, tagger| {
                name == "v1.4.3" && target == "head123" && tagger.email == "dev@example.com"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok("tagobj1".to_string()));
        sink.expect_create_ref()
            .with(eq("refs/tags/v1.4.3"), eq("tagobj1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        apply_plan(&plan_with(None), &tagger(), &sink, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_repoint_deletes_before_recreating() {
        let mut sink = MockTagSink::new();
        let mut seq = Sequence::new();

        sink.expect_create_annotated_tag()
            .withf(|name, _, _, _| name == "v1.4.3")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok("tagobj1".to_string()));
        sink.expect_create_ref()
            .with(eq("refs/tags/v1.4.3"), eq("tagobj1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        sink.expect_delete_ref()
            .with(eq("refs/tags/v1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_create_annotated_tag()
            .withf(|name, target, _, _| name == "v1" && target == "head123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok("tagobj2".to_string()));
        sink.expect_create_ref()
            .with(eq("refs/tags/v1"), eq("tagobj2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let plan = plan_with(Some(MajorPointerAction::Repoint(tag("v1"))));
        apply_plan(&plan, &tagger(), &sink, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_pointer_never_deletes() {
        let mut sink = MockTagSink::new();
        sink.expect_create_annotated_tag()
            .times(2)
            .returning(|name, _, _, _| Ok(format!("obj-{}", name)));
        sink.expect_create_ref().times(2).returning(|_, _| Ok(()));
        sink.expect_delete_ref().never();

        let plan = plan_with(Some(MajorPointerAction::Create(tag("v2"))));
        apply_plan(&plan, &tagger(), &sink, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let mut sink = MockTagSink::new();
        sink.expect_create_annotated_tag().never();
        sink.expect_create_ref().never();
        sink.expect_delete_ref().never();

        let plan = plan_with(Some(MajorPointerAction::Repoint(tag("v1"))));
        apply_plan(&plan, &tagger(), &sink, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_stops_remaining_operations() {
        let mut sink = MockTagSink::new();
        sink.expect_create_annotated_tag()
            .times(1)
            .returning(|_, _, _, _| {
                Err(RemoteError::Failed {
                    operation: "create tag object",
                    message: "boom".to_string(),
                })
            });
        sink.expect_create_ref().never();
        sink.expect_delete_ref().never();

        let plan = plan_with(Some(MajorPointerAction::Repoint(tag("v1"))));
        let err = apply_plan(&plan, &tagger(), &sink, false).await.unwrap_err();
        assert!(matches!(err, RemoteError::Failed { .. }));
    }
}
