//! GitHub API operations using octocrab.

pub mod auth;
pub mod client;
pub mod repository;

pub use auth::get_github_token;
pub use client::GitHubRepo;
pub use repository::RepositoryId;
