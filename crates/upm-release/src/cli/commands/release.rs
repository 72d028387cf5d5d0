//! Release command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use upm_release_core::config::Config;
use upm_release_core::error::ConfigError;
use upm_release_core::platform::{PackagingCredentials, PullRequestSource};
use upm_release_core::{CiContext, RepoSlug};
use upm_release_git::{RepoIdentity, ResolvedTarget, SplitMode};
use upm_release_unity::{locate_editor, UnityPackager, EDITOR_ENV};

use super::{actor_fallbacks, input, PackageArgs, Session};
use crate::cli::{output, Cli, OutputFormat};
use crate::workflow::{OfflinePullRequests, ReleasePlan, ReleaseSettings, ReleaseWorkflow};

/// Package the UPM package and publish it as a draft GitHub release
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// GitHub token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Unity account user name
    #[arg(long, env = "INPUT_USERNAME")]
    pub username: Option<String>,

    /// Unity account password
    #[arg(long, env = "INPUT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Unity cloud organization id
    #[arg(long, env = "INPUT_ORGANIZATION-ID")]
    pub organization_id: Option<String>,

    /// Release notes to use verbatim instead of composing them
    #[arg(long, env = "INPUT_RELEASE-NOTES")]
    pub release_notes: Option<String>,

    #[command(flatten)]
    pub package: PackageArgs,

    /// Release title (default: `<name> <version>`)
    #[arg(long, env = "INPUT_RELEASE-TITLE")]
    pub release_title: Option<String>,

    /// Unity editor executable
    #[arg(long)]
    pub unity_editor: Option<PathBuf>,

    /// Dry run - compose the release without touching the checkout, packaging or publishing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli, context))
    }

    async fn execute_async(&self, cli: &Cli, context: &CiContext) -> anyhow::Result<()> {
        info!(dry_run = self.dry_run, "executing release command");

        let token = input(&self.github_token).or(context.token.as_deref());
        if token.is_none() && !self.dry_run {
            return Err(ConfigError::MissingToken.into());
        }
        let credentials = if self.dry_run {
            None
        } else {
            Some(self.credentials()?)
        };

        let mut session = Session::open(context).await?;
        session.note_defaults(cli);
        self.apply(&mut session.config);

        let repository = session.repository(context).await?;
        let github = session.github(context, &repository, token)?;
        let settings = self.settings(&session, context, repository);
        let workflow = ReleaseWorkflow::new(&session.git, &settings);

        let plan = workflow.plan().await?;
        if !cli.quiet && cli.format == OutputFormat::Text {
            print_preview(&plan, &settings, self.dry_run);
        }

        if !self.confirmed(context)? {
            println!("{}", style("Aborted.").yellow());
            return Ok(());
        }

        let offline = OfflinePullRequests;
        let pull_requests: &dyn PullRequestSource = match &github {
            Some(client) => client,
            None => &offline,
        };
        let prepared = workflow.prepare(&plan, pull_requests).await?;
        if !cli.quiet && cli.format == OutputFormat::Text {
            output::info(&target_summary(&prepared.target));
        }

        for warning in &prepared.notes.warnings {
            output::warning(warning);
        }
        if cli.format == OutputFormat::Text {
            output::group("----- Release Notes -----", &prepared.notes.notes);
        }

        let (Some(github), Some(credentials)) = (github, credentials) else {
            let result = prepared.result();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text if !cli.quiet => output::success(&format!(
                    "Dry run complete. {} would be released from {}.",
                    output::version_style().apply_to(&result.package),
                    output::tag_style().apply_to(&result.commitish)
                )),
                OutputFormat::Text => {}
            }
            return Ok(());
        };

        let editor = locate_editor(
            self.unity_editor
                .as_deref()
                .or(session.config.unity.editor.as_deref()),
            std::env::var(EDITOR_ENV).ok().as_deref(),
        )?;
        let packager = UnityPackager::new(editor, credentials)
            .with_extra_args(session.config.unity.extra_args.clone());

        let scratch = scratch_dir(context)?;
        let result = workflow
            .publish(&prepared, &github, &packager, scratch.path())
            .await?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Text => {
                if !cli.quiet {
                    if let Some(url) = &result.release_url {
                        output::success(&format!(
                            "Release created: {}",
                            output::path_style().apply_to(url)
                        ));
                    }
                    if let Some(url) = &result.asset_url {
                        output::success(&format!(
                            "Release asset uploaded: {}",
                            output::path_style().apply_to(url)
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Packaging credentials; all three are required to publish
    fn credentials(&self) -> Result<PackagingCredentials, ConfigError> {
        let required = |value: &Option<String>, name: &str| {
            input(value)
                .map(str::to_string)
                .ok_or_else(|| {
                    ConfigError::MissingField(format!(
                        "{name} (--{name} or INPUT_{})",
                        name.to_uppercase()
                    ))
                })
        };

        Ok(PackagingCredentials {
            username: required(&self.username, "username")?,
            password: required(&self.password, "password")?,
            organization_id: required(&self.organization_id, "organization-id")?,
        })
    }

    fn apply(&self, config: &mut Config) {
        self.package.apply(config);
        if let Some(title) = input(&self.release_title) {
            config.release.title = title.to_string();
        }
    }

    fn settings(
        &self,
        session: &Session,
        context: &CiContext,
        repository: RepoSlug,
    ) -> ReleaseSettings {
        let config = &session.config;
        ReleaseSettings {
            workspace: session.workspace.clone(),
            manifest_glob: config.release.package_json.clone(),
            split: SplitMode::from_setting(&config.release.split_branch),
            remote: config.release.remote.clone(),
            dry_run: self.dry_run,
            title: config.release.title.clone(),
            identity: RepoIdentity {
                name: config.git.user_name.clone(),
                email: config.git.user_email.clone(),
            },
            fetch_tags: config.git.fetch_tags,
            // Kept verbatim; only blank input counts as absent
            explicit_notes: self
                .release_notes
                .clone()
                .filter(|notes| !notes.trim().is_empty()),
            triggering_sha: context.sha.clone(),
            server_url: session.server_url(context),
            repository,
            actors: actor_fallbacks(context),
        }
    }

    /// Ask before mutating anything when running interactively
    fn confirmed(&self, context: &CiContext) -> anyhow::Result<bool> {
        if self.yes || self.dry_run || context.actions || !console::Term::stdout().is_term() {
            return Ok(true);
        }

        Ok(Confirm::new()
            .with_prompt("Proceed with release?")
            .default(true)
            .interact()?)
    }
}

fn print_preview(plan: &ReleasePlan, settings: &ReleaseSettings, dry_run: bool) {
    println!("{}", output::header("Release Preview"));
    println!();
    println!("{}", output::key_value("Package", &plan.package.name));
    println!(
        "{}",
        output::key_value(
            "Version",
            &output::version_style().apply_to(&plan.package.version).to_string()
        )
    );
    println!(
        "{}",
        output::key_value(
            "Previous tag",
            &output::tag_style()
                .apply_to(plan.previous_tag.as_deref().unwrap_or("(none)"))
                .to_string()
        )
    );
    println!(
        "{}",
        output::key_value(
            "Package dir",
            &output::path_style().apply_to(plan.package_dir.display()).to_string()
        )
    );
    let mode = match settings.split.branch() {
        Some(branch) => format!("split into '{branch}'"),
        None => "direct".to_string(),
    };
    println!("{}", output::key_value("Target", &mode));
    println!();

    if dry_run {
        println!(
            "  {}",
            style("[DRY RUN - nothing will be pushed or published]")
                .yellow()
                .bold()
        );
        println!();
    }
}

/// Line reporting the commit the release is attached to
fn target_summary(target: &ResolvedTarget) -> String {
    let commit = output::tag_style().apply_to(&target.commitish);
    match &target.split_branch {
        Some(branch) => format!("Using target commit {commit} (split branch '{branch}')"),
        None => format!("Using target commit {commit}"),
    }
}

/// Fresh scratch directory for the packaging output
fn scratch_dir(context: &CiContext) -> std::io::Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("upm-release-");
    match &context.runner_temp {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> ReleaseCommand {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            cmd: ReleaseCommand,
        }
        let mut argv = vec!["release"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).unwrap().cmd
    }

    #[test]
    fn test_credentials_required() {
        let cmd = parse(&["--username", "dev", "--password", "secret"]);
        let err = cmd.credentials().unwrap_err();
        assert!(err.to_string().contains("organization-id"));

        let cmd = parse(&[
            "--username",
            "dev",
            "--password",
            "secret",
            "--organization-id",
            "acme",
        ]);
        let creds = cmd.credentials().unwrap();
        assert_eq!(creds.organization_id, "acme");
    }

    #[test]
    fn test_title_override() {
        let cmd = parse(&["--release-title", "Tools {version}"]);
        let mut config = Config::default();
        cmd.apply(&mut config);
        assert_eq!(config.release.title, "Tools {version}");
    }

    #[test]
    fn test_target_summary_names_commit() {
        console::set_colors_enabled(false);
        let mut target = ResolvedTarget {
            commitish: "5p1175ha".to_string(),
            package_dir: PathBuf::from("/ws"),
            manifest_path: PathBuf::from("/ws/package.json"),
            split_branch: Some("upm".to_string()),
        };
        assert_eq!(
            target_summary(&target),
            "Using target commit 5p1175ha (split branch 'upm')"
        );

        target.split_branch = None;
        assert_eq!(target_summary(&target), "Using target commit 5p1175ha");
    }

    #[test]
    fn test_scratch_dir_in_runner_temp() {
        let temp = tempfile::tempdir().unwrap();
        let context = CiContext {
            runner_temp: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let scratch = scratch_dir(&context).unwrap();
        assert!(scratch.path().starts_with(temp.path()));
        assert!(scratch.path().is_dir());
    }
}
