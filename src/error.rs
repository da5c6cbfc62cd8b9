//! Error types for autotag modules using thiserror.

use thiserror::Error;

/// Errors from version parsing and bumping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format in '{name}': {reason}")]
    InvalidFormat { name: String, reason: String },

    #[error("Cannot bump the {component} of {version}: it is already at the maximum value")]
    Overflow {
        version: String,
        component: &'static str,
    },
}

impl VersionError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from the remote repository host.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error(
        "GitHub authentication failed: no valid auth found. Set INPUT_GITHUB_TOKEN or GITHUB_TOKEN, or run 'gh auth login'"
    )]
    AuthenticationFailed,

    #[error("Rate limited by GitHub API while trying to {operation}")]
    RateLimited { operation: &'static str },

    #[error("Failed to {operation}: {resource} not found")]
    NotFound {
        operation: &'static str,
        resource: String,
    },

    #[error("Failed to {operation}: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Failed to {operation}: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

/// Errors from configuration loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "No GitHub token available. Set INPUT_GITHUB_TOKEN or GITHUB_TOKEN, or run 'gh auth login'"
    )]
    MissingToken,

    #[error("No repository configured. Set INPUT_REPOSITORY or GITHUB_REPOSITORY")]
    MissingRepository,

    #[error("Invalid repository identifier '{0}': expected 'owner/repo'")]
    InvalidRepository(String),

    #[error("Invalid bump strategy '{0}': expected one of major, minor, patch, skip")]
    InvalidBumpStrategy(String),

    #[error("Invalid boolean value '{value}' for {var}")]
    InvalidBool { var: &'static str, value: String },
}

/// Errors that abort a tagging run.
#[derive(Error, Debug)]
pub enum AutoTagError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
