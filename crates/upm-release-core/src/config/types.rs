//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::manifest::DEFAULT_MANIFEST_GLOB;

/// Sentinel split-branch value that disables subtree splitting
pub const SPLIT_DISABLED: &str = "none";

/// Main configuration for upm-release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Release behaviour
    pub release: ReleaseConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Unity editor configuration
    pub unity: UnityConfig,

    /// GitHub endpoints
    pub github: GitHubConfig,
}

/// Release configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Glob locating the package manifest
    pub package_json: String,

    /// Branch receiving the subtree split (`none` disables splitting)
    pub split_branch: String,

    /// Release title template (`{name}`, `{version}`)
    pub title: String,

    /// Remote the split branch is pushed to
    pub remote: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            package_json: DEFAULT_MANIFEST_GLOB.to_string(),
            split_branch: "upm".to_string(),
            title: "{name} {version}".to_string(),
            remote: "origin".to_string(),
        }
    }
}

impl ReleaseConfig {
    /// The split branch name, or `None` when splitting is disabled
    pub fn split_branch(&self) -> Option<&str> {
        let branch = self.split_branch.trim();
        if branch.is_empty() || branch.eq_ignore_ascii_case(SPLIT_DISABLED) {
            None
        } else {
            Some(branch)
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Committer name configured before mutating the repository
    pub user_name: String,

    /// Committer email configured before mutating the repository
    pub user_email: String,

    /// Fetch all tags before reading the tag catalog
    pub fetch_tags: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            user_name: "github-actions[bot]".to_string(),
            user_email: "github-actions[bot]@users.noreply.github.com".to_string(),
            fetch_tags: true,
        }
    }
}

/// Unity editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnityConfig {
    /// Path to the editor executable
    pub editor: Option<PathBuf>,

    /// Extra arguments appended to the editor invocation
    pub extra_args: Vec<String>,
}

/// GitHub endpoint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: Option<String>,

    /// Web base URL used for changelog links
    pub server_url: Option<String>,
}
