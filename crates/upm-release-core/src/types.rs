//! Core types for upm-release

use serde::{Deserialize, Serialize};

/// Name and version of the package being released, as read from its manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    /// Package name (e.g. `com.example.tools`)
    pub name: String,
    /// Authoritative version for this release
    pub version: String,
}

impl PackageIdentity {
    /// Create a new package identity
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Whether the version carries the `-pre` marker
    pub fn is_prerelease(&self) -> bool {
        self.version.contains("-pre")
    }

    /// Render a title template containing `{name}` and `{version}`
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{name}", &self.name)
            .replace("{version}", &self.version)
    }
}

impl std::fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// An `owner/repo` pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoSlug {
    /// Create a new slug
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Derive the slug from a remote URL such as
    /// `https://github.com/owner/repo.git` or `git@github.com:owner/repo.git`
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');
        let url = url.strip_suffix(".git").unwrap_or(url);

        let path = match url.split_once("://") {
            Some((_, rest)) => rest.split_once('/')?.1,
            None => url.split_once(':')?.1,
        };

        let mut parts = path.rsplitn(2, '/');
        let repo = parts.next()?;
        let owner = parts.next()?.rsplit('/').next()?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(format!("Invalid repository '{}', expected owner/repo", s)),
        }
    }
}

/// Result of a release run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResult {
    /// The package that was released
    pub package: PackageIdentity,
    /// Previous release tag, if any
    pub previous_tag: Option<String>,
    /// Commit or branch the release points at
    pub commitish: String,
    /// Whether the release is flagged as a prerelease
    pub prerelease: bool,
    /// Final composed release notes
    pub notes: String,
    /// Release page URL (absent on dry runs)
    pub release_url: Option<String>,
    /// Uploaded asset download URL (absent on dry runs)
    pub asset_url: Option<String>,
}

impl ReleaseResult {
    /// Create a new release result
    pub fn new(package: PackageIdentity, commitish: impl Into<String>, notes: impl Into<String>) -> Self {
        let prerelease = package.is_prerelease();
        Self {
            package,
            previous_tag: None,
            commitish: commitish.into(),
            prerelease,
            notes: notes.into(),
            release_url: None,
            asset_url: None,
        }
    }

    /// Set the previous tag
    pub fn with_previous_tag(mut self, tag: Option<String>) -> Self {
        self.previous_tag = tag;
        self
    }

    /// Set the release page URL
    pub fn with_release_url(mut self, url: impl Into<String>) -> Self {
        self.release_url = Some(url.into());
        self
    }

    /// Set the asset download URL
    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = Some(url.into());
        self
    }

    /// Whether anything was published
    pub fn published(&self) -> bool {
        self.release_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_prerelease_marker() {
        assert!(PackageIdentity::new("pkg", "1.0.0-pre.1").is_prerelease());
        assert!(PackageIdentity::new("pkg", "2.0.0-preview").is_prerelease());
        assert!(!PackageIdentity::new("pkg", "1.0.0").is_prerelease());
        assert!(!PackageIdentity::new("pkg", "1.0.0-exp.1").is_prerelease());
    }

    #[test]
    fn test_render_title() {
        let id = PackageIdentity::new("com.example.tools", "1.2.3");
        assert_eq!(id.render("{name} {version}"), "com.example.tools 1.2.3");
        assert_eq!(id.render("Release v{version}"), "Release v1.2.3");
    }

    #[test]
    fn test_repo_slug_parse() {
        let slug = RepoSlug::from_str("octo/widgets").unwrap();
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.repo, "widgets");
        assert_eq!(slug.to_string(), "octo/widgets");

        assert!(RepoSlug::from_str("octo").is_err());
        assert!(RepoSlug::from_str("/widgets").is_err());
        assert!(RepoSlug::from_str("a/b/c").is_err());
    }

    #[test]
    fn test_repo_slug_from_remote_url() {
        let expected = Some(RepoSlug::new("octo", "widgets"));
        assert_eq!(RepoSlug::from_remote_url("https://github.com/octo/widgets.git"), expected);
        assert_eq!(RepoSlug::from_remote_url("https://github.com/octo/widgets"), expected);
        assert_eq!(RepoSlug::from_remote_url("git@github.com:octo/widgets.git"), expected);
        assert_eq!(
            RepoSlug::from_remote_url("ssh://git@github.com/octo/widgets.git\n"),
            expected
        );
        assert_eq!(RepoSlug::from_remote_url("https://github.com/"), None);
        assert_eq!(RepoSlug::from_remote_url("/srv/git/widgets"), None);
    }

    #[test]
    fn test_release_result_builder() {
        let result = ReleaseResult::new(PackageIdentity::new("pkg", "1.0.0-pre"), "abc123", "notes")
            .with_previous_tag(Some("0.9.0".to_string()))
            .with_release_url("https://github.com/o/r/releases/1");

        assert!(result.prerelease);
        assert!(result.published());
        assert_eq!(result.previous_tag.as_deref(), Some("0.9.0"));
        assert!(result.asset_url.is_none());
    }
}
