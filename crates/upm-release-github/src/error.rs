//! GitHub error types

use thiserror::Error;

use upm_release_core::error::PlatformError;

/// GitHub API errors
#[derive(Debug, Error)]
pub enum GitHubError {
    /// API error from GitHub
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Upload URL could not be turned into a request URL
    #[error("Invalid upload URL: {0}")]
    InvalidUploadUrl(String),

    /// Asset path has no usable file name
    #[error("Invalid asset path: {0}")]
    InvalidAsset(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for PlatformError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::ApiError { status, message } => PlatformError::Api { status, message },
            GitHubError::InvalidUploadUrl(_) | GitHubError::InvalidAsset(_) => {
                PlatformError::UploadFailed(err.to_string())
            }
            GitHubError::Io(e) => PlatformError::Io(e),
            GitHubError::Http(e) => PlatformError::Http(e.to_string()),
            GitHubError::Json(e) => PlatformError::InvalidResponse(e.to_string()),
            GitHubError::Url(e) => PlatformError::InvalidResponse(e.to_string()),
        }
    }
}
