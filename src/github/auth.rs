//! GitHub token discovery.
//!
//! Checks in order:
//! 1. `INPUT_GITHUB_TOKEN` (GitHub Actions input)
//! 2. `GITHUB_TOKEN`
//! 3. `GH_TOKEN`
//! 4. `gh auth token` (gh CLI, for local runs)

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::RemoteError;

const TOKEN_ENV_VARS: [&str; 3] = ["INPUT_GITHUB_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

/// Get a GitHub token from the environment or the gh CLI.
pub fn get_github_token() -> Result<String, RemoteError> {
    if let Some(token) = get_token_from_env() {
        return Ok(token);
    }

    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using token from gh CLI");
        return Ok(token);
    }

    Err(RemoteError::AuthenticationFailed)
}

/// First non-empty token among the supported environment variables.
pub fn get_token_from_env() -> Option<String> {
    TOKEN_ENV_VARS.iter().find_map(|var| match env::var(var) {
        Ok(token) if !token.trim().is_empty() => {
            debug!(source = var, "Using token from environment");
            Some(token.trim().to_string())
        }
        _ => None,
    })
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
