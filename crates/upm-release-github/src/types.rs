//! GitHub REST payloads

use serde::{Deserialize, Serialize};

use upm_release_core::platform::{NewRelease, PublishedRelease, PullRequest, UploadedAsset};

/// Body of `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseBody<'a> {
    pub tag_name: &'a str,
    pub name: &'a str,
    pub body: &'a str,
    pub target_commitish: &'a str,
    pub prerelease: bool,
    /// Always true, releases are reviewed before publishing
    pub draft: bool,
    /// Always false, the composed notes are authoritative
    pub generate_release_notes: bool,
}

impl<'a> From<&'a NewRelease> for CreateReleaseBody<'a> {
    fn from(release: &'a NewRelease) -> Self {
        Self {
            tag_name: &release.tag_name,
            name: &release.name,
            body: &release.body,
            target_commitish: &release.target_commitish,
            prerelease: release.prerelease,
            draft: true,
            generate_release_notes: false,
        }
    }
}

/// Account reference in API responses
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: Option<String>,
}

/// Subset of a pull request response
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestResponse {
    pub number: u64,
    #[serde(default)]
    pub user: Option<UserResponse>,
}

impl From<PullRequestResponse> for PullRequest {
    fn from(response: PullRequestResponse) -> Self {
        Self {
            number: response.number,
            author: response
                .user
                .and_then(|user| user.login)
                .filter(|login| !login.is_empty()),
        }
    }
}

/// Subset of a release response
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseResponse {
    pub id: u64,
    pub html_url: String,
    pub upload_url: String,
}

impl From<ReleaseResponse> for PublishedRelease {
    fn from(response: ReleaseResponse) -> Self {
        Self {
            id: response.id,
            html_url: response.html_url,
            upload_url: response.upload_url,
        }
    }
}

/// Subset of a release asset response
#[derive(Debug, Clone, Deserialize)]
pub struct AssetResponse {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

impl From<AssetResponse> for UploadedAsset {
    fn from(response: AssetResponse) -> Self {
        Self {
            name: response.name,
            browser_download_url: response.browser_download_url,
            size: response.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_author() {
        let response: PullRequestResponse = serde_json::from_str(
            r#"{"number": 42, "title": "Release", "user": {"login": "octocat", "id": 1}}"#,
        )
        .unwrap();
        let pr = PullRequest::from(response);
        assert_eq!(pr.number, 42);
        assert_eq!(pr.author.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_pull_request_without_user() {
        let response: PullRequestResponse =
            serde_json::from_str(r#"{"number": 7, "user": null}"#).unwrap();
        assert_eq!(PullRequest::from(response).author, None);

        let response: PullRequestResponse = serde_json::from_str(r#"{"number": 7}"#).unwrap();
        assert_eq!(PullRequest::from(response).author, None);
    }

    #[test]
    fn test_create_release_body_is_always_draft() {
        let release = NewRelease {
            tag_name: "1.2.0".to_string(),
            name: "com.acme.tools 1.2.0".to_string(),
            body: "notes".to_string(),
            target_commitish: "abc123".to_string(),
            prerelease: false,
        };
        let json = serde_json::to_value(CreateReleaseBody::from(&release)).unwrap();

        assert_eq!(json["tag_name"], "1.2.0");
        assert_eq!(json["target_commitish"], "abc123");
        assert_eq!(json["draft"], true);
        assert_eq!(json["generate_release_notes"], false);
    }
}
