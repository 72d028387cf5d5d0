//! CI environment context
//!
//! Everything the release flow needs from the ambient GitHub Actions
//! environment is read once here and passed down explicitly. Each consumer
//! takes only the fields it needs.

use std::path::PathBuf;

use tracing::debug;

use crate::types::RepoSlug;

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default GitHub web URL
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Values taken from the CI environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiContext {
    /// Checked-out workspace root (`GITHUB_WORKSPACE`)
    pub workspace: Option<PathBuf>,
    /// Commit that triggered the run (`GITHUB_SHA`)
    pub sha: Option<String>,
    /// Actor of the triggering event (`GITHUB_ACTOR`)
    pub actor: Option<String>,
    /// Actor-name fallback (`GITHUB_TRIGGERING_ACTOR`)
    pub triggering_actor: Option<String>,
    /// Repository slug (`GITHUB_REPOSITORY`)
    pub repository: Option<RepoSlug>,
    /// Scratch directory for the packaging step (`RUNNER_TEMP`)
    pub runner_temp: Option<PathBuf>,
    /// Generic automation token (`GITHUB_TOKEN`)
    pub token: Option<String>,
    /// REST API base URL (`GITHUB_API_URL`)
    pub api_url: Option<String>,
    /// Web base URL (`GITHUB_SERVER_URL`)
    pub server_url: Option<String>,
    /// Whether we run inside GitHub Actions (`GITHUB_ACTIONS=true`)
    pub actions: bool,
}

impl CiContext {
    /// Read the context from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values are treated as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let context = Self {
            workspace: get("GITHUB_WORKSPACE").map(PathBuf::from),
            sha: get("GITHUB_SHA"),
            actor: get("GITHUB_ACTOR"),
            triggering_actor: get("GITHUB_TRIGGERING_ACTOR"),
            repository: get("GITHUB_REPOSITORY").and_then(|r| r.parse().ok()),
            runner_temp: get("RUNNER_TEMP").map(PathBuf::from),
            token: get("GITHUB_TOKEN"),
            api_url: get("GITHUB_API_URL"),
            server_url: get("GITHUB_SERVER_URL"),
            actions: get("GITHUB_ACTIONS").is_some_and(|v| v == "true"),
        };

        debug!(
            workspace = ?context.workspace,
            sha = ?context.sha,
            repository = ?context.repository.as_ref().map(|r| r.to_string()),
            actions = context.actions,
            "read CI context"
        );
        context
    }

    /// API base URL with the default applied
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Web base URL with the default applied
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context_from(pairs: &[(&str, &str)]) -> CiContext {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CiContext::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_reads_actions_environment() {
        let ctx = context_from(&[
            ("GITHUB_WORKSPACE", "/home/runner/work/repo/repo"),
            ("GITHUB_SHA", "0123abcd"),
            ("GITHUB_ACTOR", "octocat"),
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("RUNNER_TEMP", "/home/runner/work/_temp"),
            ("GITHUB_ACTIONS", "true"),
        ]);

        assert_eq!(ctx.workspace, Some(PathBuf::from("/home/runner/work/repo/repo")));
        assert_eq!(ctx.sha.as_deref(), Some("0123abcd"));
        assert_eq!(ctx.actor.as_deref(), Some("octocat"));
        assert_eq!(ctx.repository, Some(RepoSlug::new("octo", "widgets")));
        assert!(ctx.actions);
        assert_eq!(ctx.api_url(), DEFAULT_API_URL);
        assert_eq!(ctx.server_url(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let ctx = context_from(&[("GITHUB_SHA", "  "), ("GITHUB_TOKEN", "")]);
        assert!(ctx.sha.is_none());
        assert!(ctx.token.is_none());
        assert!(!ctx.actions);
    }

    #[test]
    fn test_enterprise_urls() {
        let ctx = context_from(&[
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
            ("GITHUB_SERVER_URL", "https://ghe.example.com"),
        ]);
        assert_eq!(ctx.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(ctx.server_url(), "https://ghe.example.com");
    }
}
