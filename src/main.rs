//! autotag - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use autotag::github::GitHubRepo;
use autotag::{Config, MajorPointerAction, RunOutcome, logging, run};

/// Create the next semantic version tag for the current CI run.
///
/// Configuration is read from the environment (INPUT_* action inputs and
/// GITHUB_* runner variables).
#[derive(Parser, Debug)]
#[command(name = "autotag")]
#[command(about = "Create the next semantic version tag from commit markers")]
#[command(version)]
struct Cli {
    /// Compute tags without creating or deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::env_filter(cli.quiet, cli.verbose, "info"));

    let mut config = Config::from_env().context("Invalid configuration")?;
    config.dry_run |= cli.dry_run;

    if config.dry_run {
        println!("Running in dry-run mode!");
    }

    let repo = GitHubRepo::new(&config).context("Failed to set up GitHub client")?;

    let outcome = run(&config, &repo)
        .await
        .with_context(|| format!("Tagging {} failed", config.repository))?;

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NotMainBranch { current, main } => {
            println!(
                "Not running from the default branch ({} != {}), nothing to do",
                current.as_deref().unwrap_or("unknown"),
                main
            );
        }
        RunOutcome::Skipped { previous } => {
            println!("Previous tag version: {}", previous.name);
            println!("No need to create a new tag, skipping");
        }
        RunOutcome::Tagged { plan, dry_run } => {
            let verb = if *dry_run { "Would create" } else { "Created" };
            println!("Previous tag version: {}", plan.previous.name);
            println!(
                "{} tag {} ({} bump) at {}",
                verb, plan.version_tag.name, plan.strategy, plan.version_tag.commit
            );
            match &plan.major {
                Some(MajorPointerAction::Repoint(tag)) => {
                    let verb = if *dry_run { "Would move" } else { "Moved" };
                    println!("{} major tag {} to {}", verb, tag.name, tag.commit);
                }
                Some(MajorPointerAction::Create(tag)) => {
                    println!("{} major tag {} at {}", verb, tag.name, tag.commit);
                }
                None => {}
            }
        }
    }
}
