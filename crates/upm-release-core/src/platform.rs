//! Seams to the external collaborators: the release platform, pull-request
//! metadata, and the packaging tool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackagingError, PlatformError};

/// Pull-request metadata used to credit a release.
///
/// A missing author is a normal state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull-request number
    pub number: u64,
    /// Login of the pull-request author
    pub author: Option<String>,
}

/// Request to create a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    /// Tag to create (the package version)
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release notes body
    pub body: String,
    /// Commit or branch the tag is created on
    pub target_commitish: String,
    /// Mark as prerelease
    pub prerelease: bool,
}

/// A release that was created on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRelease {
    /// Platform release id
    pub id: u64,
    /// Release page URL
    pub html_url: String,
    /// Upload URL template for assets
    pub upload_url: String,
}

/// A binary asset attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// Asset file name
    pub name: String,
    /// Public download URL
    pub browser_download_url: String,
    /// Size in bytes
    pub size: u64,
}

/// Looks up pull-request metadata
#[async_trait::async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch a pull request by number
    async fn pull_request(&self, number: u64) -> Result<PullRequest, PlatformError>;
}

/// Creates releases and uploads their assets
#[async_trait::async_trait]
pub trait ReleasePlatform: PullRequestSource {
    /// Create a release
    async fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease, PlatformError>;

    /// Upload one archive to an existing release
    async fn upload_asset(
        &self,
        release: &PublishedRelease,
        path: &Path,
    ) -> Result<UploadedAsset, PlatformError>;
}

/// Credentials handed opaquely to the packaging tool
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PackagingCredentials {
    /// Account user name
    pub username: String,
    /// Account password
    pub password: String,
    /// Cloud organization id
    pub organization_id: String,
}

impl std::fmt::Debug for PackagingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackagingCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Turns a package directory into a single signed archive
#[async_trait::async_trait]
pub trait Packager: Send + Sync {
    /// Pack `package_dir` into `output_dir` and return the produced archive
    async fn pack(&self, package_dir: &Path, output_dir: &Path) -> Result<PathBuf, PackagingError>;
}
