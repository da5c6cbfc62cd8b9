//! Run configuration, read from the environment.
//!
//! Variable names follow the GitHub Actions convention: action inputs arrive
//! as `INPUT_<NAME>`, runner context as `GITHUB_<NAME>`.

use std::env;
use std::fmt;

use crate::error::ConfigError;
use crate::github::RepositoryId;
use crate::github::auth::get_github_token;
use crate::version::{BumpStrategy, VersionFormat};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAIN_BRANCH: &str = "main";
pub const DEFAULT_PREFIX: &str = "v";
pub const DEFAULT_BUMP_STRATEGY: BumpStrategy = BumpStrategy::Minor;

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub repository: RepositoryId,
    /// Tags are only created for runs on this branch.
    pub main_branch: String,
    /// Branch the CI run was triggered for (`GITHUB_REF_NAME`).
    pub current_branch: Option<String>,
    /// Commit the CI run was triggered for (`GITHUB_SHA`).
    pub head_sha: Option<String>,
    /// Strategy used when no commit carries a marker.
    pub bump_strategy: BumpStrategy,
    pub format: VersionFormat,
    pub dry_run: bool,
    pub bind_to_major: bool,
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("main_branch", &self.main_branch)
            .field("current_branch", &self.current_branch)
            .field("head_sha", &self.head_sha)
            .field("bump_strategy", &self.bump_strategy)
            .field("format", &self.format)
            .field("dry_run", &self.dry_run)
            .field("bind_to_major", &self.bind_to_major)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Load the configuration, discovering the token via env vars or gh CLI.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_token(get_github_token().ok())
    }

    /// Load everything but the token from the environment.
    pub fn from_env_with_token(token: Option<String>) -> Result<Self, ConfigError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let repository = non_empty("INPUT_REPOSITORY")
            .or_else(|| non_empty("GITHUB_REPOSITORY"))
            .ok_or(ConfigError::MissingRepository)?
            .parse()?;

        let bump_strategy = match non_empty("INPUT_BUMP_STRATEGY") {
            Some(value) => value.parse()?,
            None => DEFAULT_BUMP_STRATEGY,
        };

        let prefix = env::var("INPUT_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
        let suffix = env::var("INPUT_SUFFIX").unwrap_or_default();

        Ok(Self {
            token,
            repository,
            main_branch: non_empty("INPUT_MAIN_BRANCH")
                .unwrap_or_else(|| DEFAULT_MAIN_BRANCH.to_string()),
            current_branch: non_empty("GITHUB_REF_NAME"),
            head_sha: non_empty("GITHUB_SHA"),
            bump_strategy,
            format: VersionFormat::new(prefix, suffix),
            dry_run: env_bool("INPUT_DRY_RUN", false)?,
            bind_to_major: env_bool("INPUT_BIND_TO_MAJOR", false)?,
            api_url: non_empty("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    pub fn is_main_branch(&self) -> bool {
        self.current_branch.as_deref() == Some(self.main_branch.as_str())
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match non_empty(var) {
        Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool { var, value }),
        None => Ok(default),
    }
}

/// Parse the boolean spellings GitHub Actions users tend to write.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
