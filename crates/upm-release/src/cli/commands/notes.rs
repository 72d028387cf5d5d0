//! Notes command

use clap::Args;
use tracing::info;

use upm_release_changelog::{ChangelogComposer, ComposeRequest};
use upm_release_core::platform::PullRequestSource;
use upm_release_core::{find_manifest, load_manifest, CiContext};
use upm_release_git::{rev_parse, TagCatalog};

use super::{actor_fallbacks, input, PackageArgs, Session};
use crate::cli::{output, Cli, OutputFormat};
use crate::workflow::OfflinePullRequests;

/// Compose release notes without publishing
#[derive(Debug, Args)]
pub struct NotesCommand {
    /// Commit whose message is used
    #[arg(long, default_value = "HEAD")]
    pub commitish: String,

    /// Previous tag for the changelog link (default: latest release tag)
    #[arg(long)]
    pub last_tag: Option<String>,

    /// GitHub token for pull-request lookups (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[command(flatten)]
    pub package: PackageArgs,
}

impl NotesCommand {
    /// Execute the notes command
    pub fn execute(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli, context))
    }

    async fn execute_async(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        info!(commitish = %self.commitish, "executing notes command");
        let mut session = Session::open(context).await?;
        self.package.apply(&mut session.config);

        let manifest = find_manifest(&session.workspace, &session.config.release.package_json)?;
        let package = load_manifest(&manifest)?;

        let last_tag = match input(&self.last_tag) {
            Some(tag) => Some(tag.to_string()),
            None => TagCatalog::load(&session.git)
                .await?
                .previous_tag()
                .map(str::to_string),
        };
        let commitish = rev_parse(&session.git, &self.commitish).await?;

        let repository = session.repository(context).await?;
        let github = session.github(context, &repository, input(&self.github_token))?;
        let offline = OfflinePullRequests;
        let pull_requests: &dyn PullRequestSource = match &github {
            Some(client) => client,
            None => &offline,
        };

        let request = ComposeRequest {
            package,
            explicit_notes: None,
            last_tag,
            commitish,
            server_url: session.server_url(context),
            repository,
            actors: actor_fallbacks(context),
        };
        let composed = ChangelogComposer::new(&session.git, pull_requests)
            .compose(&request)
            .await?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&composed)?),
            OutputFormat::Text => {
                for warning in &composed.warnings {
                    output::warning(warning);
                }
                println!("{}", composed.notes);
            }
        }

        Ok(())
    }
}
