//! Repository identifiers (`owner/repo`).

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = ConfigError;

    /// Accepts `owner/repo` as well as GitHub SSH and HTTPS remote URLs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepository(s.to_string());
        let trimmed = s.trim();

        let path = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
            rest
        } else if trimmed.contains("github.com/") {
            trimmed.split("github.com/").nth(1).ok_or_else(invalid)?
        } else {
            trimmed
        };

        let path = path.strip_suffix(".git").unwrap_or(path);
        let path = path.trim_end_matches('/');
        let mut parts = path.split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}
