//! autotag - bump and create semantic version tags from CI.
//!
//! # Overview
//!
//! autotag looks at the commits since the latest version tag, picks a bump
//! (`[#major]`, `[#minor]`, `[#patch]`, `[#skip]` markers, or a configured
//! default), creates the next version tag through the GitHub API and can keep
//! a floating major tag (e.g. `v2`) pointed at the newest release.

pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod pipeline;
pub mod remote;
pub mod tags;
pub mod version;

// Re-export commonly used types
pub use config::Config;
pub use error::{AutoTagError, ConfigError, RemoteError, VersionError};
pub use pipeline::{RunOutcome, run};
pub use tags::{Commit, Identity, MajorPointerAction, Tag, TagPlan};
pub use version::{BumpStrategy, VersionFormat};
