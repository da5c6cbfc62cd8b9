//! Tag naming scheme: a version wrapped in a prefix and suffix.

use semver::Version;

use crate::error::VersionError;

/// How version numbers are spelled as tag names.
///
/// Version tags are `prefix + X.Y.Z + suffix` (e.g. `v1.4.2`), major-pointer
/// tags are `prefix + X + suffix` (e.g. `v1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFormat {
    pub prefix: String,
    pub suffix: String,
}

impl Default for VersionFormat {
    fn default() -> Self {
        Self::new("v", "")
    }
}

impl VersionFormat {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Return the part of `name` between prefix and suffix.
    ///
    /// `None` when the name does not carry both, or when they overlap.
    pub fn strip<'a>(&self, name: &'a str) -> Option<&'a str> {
        if name.len() < self.prefix.len() + self.suffix.len() {
            return None;
        }
        name.strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }

    /// Parse a version tag name.
    ///
    /// Only plain `major.minor.patch` is accepted; pre-release and build
    /// metadata are rejected.
    pub fn parse(&self, name: &str) -> Result<Version, VersionError> {
        let middle = self.strip(name).ok_or_else(|| {
            VersionError::invalid(
                name,
                format!(
                    "expected prefix '{}' and suffix '{}'",
                    self.prefix, self.suffix
                ),
            )
        })?;
        parse_plain_version(middle).map_err(|reason| VersionError::invalid(name, reason))
    }

    /// Parse a major-pointer tag name (`prefix + N + suffix`).
    pub fn parse_major(&self, name: &str) -> Option<u64> {
        self.strip(name).and_then(parse_component)
    }

    /// Whether `name` is a version tag under this scheme.
    pub fn is_version_tag(&self, name: &str) -> bool {
        self.parse(name).is_ok()
    }

    pub fn format(&self, version: &Version) -> String {
        format!(
            "{}{}.{}.{}{}",
            self.prefix, version.major, version.minor, version.patch, self.suffix
        )
    }

    pub fn format_major(&self, major: u64) -> String {
        format!("{}{}{}", self.prefix, major, self.suffix)
    }
}

fn parse_plain_version(text: &str) -> Result<Version, String> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected major.minor.patch, found {} component(s) in '{}'",
            parts.len(),
            text
        ));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = parse_component(part)
            .ok_or_else(|| format!("'{}' is not a non-negative integer", part))?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// A bare run of ASCII digits that fits in a u64.
fn parse_component(text: &str) -> Option<u64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
