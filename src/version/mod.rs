//! Version model, bump strategies and marker-based strategy selection.

pub mod bump;
pub mod format;
pub mod strategy;

pub use bump::{BumpStrategy, apply_bump, bump_major, bump_minor, bump_patch};
pub use format::VersionFormat;
pub use strategy::{marker_in, select_strategy};
