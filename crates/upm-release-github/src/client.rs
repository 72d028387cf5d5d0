//! GitHub REST client

use std::path::Path;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use upm_release_core::context::DEFAULT_API_URL;
use upm_release_core::error::PlatformError;
use upm_release_core::platform::{
    NewRelease, PublishedRelease, PullRequest, PullRequestSource, ReleasePlatform, UploadedAsset,
};
use upm_release_core::types::RepoSlug;

use crate::error::{GitHubError, Result};
use crate::types::{AssetResponse, CreateReleaseBody, PullRequestResponse, ReleaseResponse};

const USER_AGENT: &str = concat!("upm-release/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Content type of packaged UPM archives
pub const ASSET_CONTENT_TYPE: &str = "application/tar+gzip";

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,
    /// Repository releases are created in
    pub repository: RepoSlug,
    token: String,
}

impl GitHubConfig {
    /// Create config for a repository on github.com
    pub fn new(repository: RepoSlug, token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repository,
            token: token.into(),
        }
    }

    /// Set API base URL (GitHub Enterprise)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// GitHub releases and pull-request client
pub struct GitHubClient {
    config: GitHubConfig,
    client: Client,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http_client(config, client))
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(config: GitHubConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Repository this client targets
    pub fn repository(&self) -> &RepoSlug {
        &self.config.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repository.owner,
            self.config.repository.repo,
            path
        )
    }

    fn authorized(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GitHubError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a pull request
    #[instrument(skip(self))]
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(&format!("/pulls/{number}"));
        debug!("Making GET request to {}", url);

        let response: PullRequestResponse = Self::send(self.authorized(Method::GET, &url)).await?;
        Ok(response.into())
    }

    /// Create a release
    #[instrument(skip(self, release), fields(tag = %release.tag_name))]
    pub async fn create(&self, release: &NewRelease) -> Result<PublishedRelease> {
        let url = self.repo_url("/releases");
        debug!("Making POST request to {}", url);

        let request = self
            .authorized(Method::POST, &url)
            .json(&CreateReleaseBody::from(release));
        let response: ReleaseResponse = Self::send(request).await?;

        info!(id = response.id, url = %response.html_url, "created release");
        Ok(response.into())
    }

    /// Upload an archive to a release
    #[instrument(skip(self, release), fields(release_id = release.id, path = %path.display()))]
    pub async fn upload(&self, release: &PublishedRelease, path: &Path) -> Result<UploadedAsset> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GitHubError::InvalidAsset(path.display().to_string()))?;
        let url = asset_upload_url(&release.upload_url, name)?;

        let content = tokio::fs::read(path).await?;
        let size = content.len();
        debug!("Uploading {} bytes to {}", size, url);

        let request = self
            .authorized(Method::POST, url.as_str())
            .header(CONTENT_TYPE, ASSET_CONTENT_TYPE)
            .header(CONTENT_LENGTH, size)
            .body(content);
        let response: AssetResponse = Self::send(request).await?;

        info!(name = %response.name, url = %response.browser_download_url, "uploaded asset");
        Ok(response.into())
    }
}

/// Expand a release's `upload_url` template for one asset.
///
/// GitHub returns a URI template such as `.../assets{?name,label}`; the
/// template part is dropped and the asset name sent as a query parameter.
pub fn asset_upload_url(template: &str, name: &str) -> Result<Url> {
    let base = template.split('{').next().unwrap_or(template).trim();
    if base.is_empty() {
        return Err(GitHubError::InvalidUploadUrl(template.to_string()));
    }

    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

#[async_trait::async_trait]
impl PullRequestSource for GitHubClient {
    async fn pull_request(&self, number: u64) -> std::result::Result<PullRequest, PlatformError> {
        Ok(self.get_pull_request(number).await?)
    }
}

#[async_trait::async_trait]
impl ReleasePlatform for GitHubClient {
    async fn create_release(
        &self,
        release: &NewRelease,
    ) -> std::result::Result<PublishedRelease, PlatformError> {
        Ok(self.create(release).await?)
    }

    async fn upload_asset(
        &self,
        release: &PublishedRelease,
        path: &Path,
    ) -> std::result::Result<UploadedAsset, PlatformError> {
        Ok(self.upload(release, path).await?)
    }
}
