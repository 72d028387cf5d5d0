//! GitHub integration for upm-release
//!
//! Creates draft releases, uploads the packaged archive to them, and looks up
//! pull requests so release notes can credit their authors.
//!
//! ## Usage
//!
//! ```ignore
//! use upm_release_github::{GitHubClient, GitHubConfig};
//!
//! let client = GitHubClient::new(GitHubConfig::new(repo, token))?;
//! let release = client.create_release(&new_release).await?;
//! client.upload_asset(&release, &archive).await?;
//! ```

mod client;
pub mod error;
pub mod types;

pub use client::{asset_upload_url, GitHubClient, GitHubConfig, ASSET_CONTENT_TYPE};
pub use error::GitHubError;
