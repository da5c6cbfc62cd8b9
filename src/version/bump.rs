//! Bump strategies and semver increments.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::{ConfigError, VersionError};

/// How the next version is derived from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpStrategy {
    Major,
    Minor,
    Patch,
    /// Do not create a tag at all.
    Skip,
}

impl BumpStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for BumpStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "skip" => Ok(Self::Skip),
            _ => Err(ConfigError::InvalidBumpStrategy(s.to_string())),
        }
    }
}

pub fn bump_major(version: &Version) -> Result<Version, VersionError> {
    let major = increment(version, version.major, "major")?;
    Ok(Version::new(major, 0, 0))
}

pub fn bump_minor(version: &Version) -> Result<Version, VersionError> {
    let minor = increment(version, version.minor, "minor")?;
    Ok(Version::new(version.major, minor, 0))
}

pub fn bump_patch(version: &Version) -> Result<Version, VersionError> {
    let patch = increment(version, version.patch, "patch")?;
    Ok(Version::new(version.major, version.minor, patch))
}

fn increment(version: &Version, value: u64, component: &'static str) -> Result<u64, VersionError> {
    value.checked_add(1).ok_or_else(|| VersionError::Overflow {
        version: version.to_string(),
        component,
    })
}

/// Apply a strategy to a version. `Skip` leaves it unchanged.
pub fn apply_bump(version: &Version, strategy: BumpStrategy) -> Result<Version, VersionError> {
    match strategy {
        BumpStrategy::Major => bump_major(version),
        BumpStrategy::Minor => bump_minor(version),
        BumpStrategy::Patch => bump_patch(version),
        BumpStrategy::Skip => Ok(Version::new(version.major, version.minor, version.patch)),
    }
}
