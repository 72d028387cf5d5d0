//! CLI commands

mod completions;
mod init;
mod notes;
mod release;
mod tags;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use notes::NotesCommand;
pub use release::ReleaseCommand;
pub use tags::TagsCommand;

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use upm_release_changelog::ActorFallbacks;
use upm_release_core::config::{load_config_or_default, Config};
use upm_release_core::error::ConfigError;
use upm_release_core::types::RepoSlug;
use upm_release_core::CiContext;
use upm_release_git::{GitRunner, SystemGit};
use upm_release_github::{GitHubClient, GitHubConfig};

use crate::cli::{Cli, OutputFormat};

/// Manifest and split-branch inputs shared by release commands
#[derive(Debug, Clone, Default, Args)]
pub struct PackageArgs {
    /// Glob locating the package manifest
    #[arg(long, env = "INPUT_PACKAGE-JSON")]
    pub package_json: Option<String>,

    /// Branch receiving the subtree split (`none` disables splitting)
    #[arg(long, env = "INPUT_SPLIT-UPM-BRANCH")]
    pub split_upm_branch: Option<String>,
}

impl PackageArgs {
    /// Apply the inputs over file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(glob) = input(&self.package_json) {
            config.release.package_json = glob.to_string();
        }
        if let Some(branch) = input(&self.split_upm_branch) {
            config.release.split_branch = branch.to_string();
        }
    }
}

/// A flag or Actions input, treating blank values as absent
pub(crate) fn input(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Repository, configuration and context shared by the commands
pub(crate) struct Session {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub workspace: PathBuf,
    pub git: SystemGit,
}

impl Session {
    /// Locate the workspace and load its configuration
    pub async fn open(context: &CiContext) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        let workspace = match &context.workspace {
            Some(workspace) => workspace.clone(),
            None => SystemGit::discover(&cwd).await?.work_tree().to_path_buf(),
        };
        debug!(workspace = %workspace.display(), config = ?config_path, "opened session");

        Ok(Self {
            git: SystemGit::new(&workspace),
            config,
            config_path,
            workspace,
        })
    }

    /// Repository slug from the CI context, else from the remote URL
    pub async fn repository(&self, context: &CiContext) -> anyhow::Result<RepoSlug> {
        if let Some(slug) = &context.repository {
            return Ok(slug.clone());
        }

        let remote = self.config.release.remote.as_str();
        let url = self.git.git(&["remote", "get-url", remote]).await?;
        RepoSlug::from_remote_url(&url).ok_or_else(|| {
            ConfigError::MissingField(format!(
                "GITHUB_REPOSITORY (remote '{remote}' URL '{}' is not a GitHub repository)",
                url.trim()
            ))
            .into()
        })
    }

    /// Web base URL for changelog links
    pub fn server_url(&self, context: &CiContext) -> String {
        self.config
            .github
            .server_url
            .clone()
            .unwrap_or_else(|| context.server_url().to_string())
    }

    /// GitHub client, when a token is available
    pub fn github(
        &self,
        context: &CiContext,
        repository: &RepoSlug,
        token: Option<&str>,
    ) -> anyhow::Result<Option<GitHubClient>> {
        let Some(token) = token.or(context.token.as_deref()) else {
            return Ok(None);
        };
        let api_url = self
            .config
            .github
            .api_url
            .clone()
            .unwrap_or_else(|| context.api_url().to_string());

        let config = GitHubConfig::new(repository.clone(), token).with_api_url(api_url);
        Ok(Some(GitHubClient::new(config)?))
    }

    /// Print a note about missing configuration
    pub fn note_defaults(&self, cli: &Cli) {
        if self.config_path.is_none() && !cli.quiet && cli.format == OutputFormat::Text {
            println!(
                "{} No configuration file found, using defaults and inputs.",
                style("→").blue()
            );
        }
    }
}

/// Actor fallbacks from the CI context
pub(crate) fn actor_fallbacks(context: &CiContext) -> ActorFallbacks {
    ActorFallbacks {
        context_actor: context.actor.clone(),
        env_actor: context.triggering_actor.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_treats_blank_as_absent() {
        assert_eq!(input(&None), None);
        assert_eq!(input(&Some(String::new())), None);
        assert_eq!(input(&Some("  ".to_string())), None);
        assert_eq!(input(&Some(" upm ".to_string())), Some("upm"));
    }

    #[test]
    fn test_package_args_override_config() {
        let mut config = Config::default();
        let args = PackageArgs {
            package_json: Some("Packages/tools/package.json".to_string()),
            split_upm_branch: Some(String::new()),
        };
        args.apply(&mut config);

        assert_eq!(config.release.package_json, "Packages/tools/package.json");
        assert_eq!(config.release.split_branch, "upm");
    }

    #[test]
    fn test_actor_fallbacks() {
        let context = CiContext {
            actor: Some("ci-actor".to_string()),
            triggering_actor: Some("trigger".to_string()),
            ..Default::default()
        };
        let actors = actor_fallbacks(&context);
        assert_eq!(actors.context_actor.as_deref(), Some("ci-actor"));
        assert_eq!(actors.env_actor.as_deref(), Some("trigger"));
    }
}
