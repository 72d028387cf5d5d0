//! Release workflow orchestration
//!
//! A release runs in three phases so the caller can report and confirm
//! between them:
//!
//! 1. [`ReleaseWorkflow::plan`] prepares the repository, reads the manifest
//!    and refuses versions that are already tagged. Nothing is pushed,
//!    packaged or sent over the network before this check passes.
//! 2. [`ReleaseWorkflow::prepare`] resolves the target commit (splitting the
//!    package into its own branch when enabled) and composes the notes.
//! 3. [`ReleaseWorkflow::publish`] packages the archive, creates the draft
//!    release and uploads the archive to it.
//!
//! On a dry run the first two phases leave the checkout alone: the committer
//! identity is not written and the split head is computed without creating,
//! pushing or checking out the branch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use upm_release_changelog::{ActorFallbacks, ChangelogComposer, ComposeRequest, ComposedNotes};
use upm_release_core::error::{ConfigError, PlatformError};
use upm_release_core::platform::{
    NewRelease, Packager, PullRequest, PullRequestSource, ReleasePlatform,
};
use upm_release_core::types::{PackageIdentity, ReleaseResult, RepoSlug};
use upm_release_core::{find_manifest, load_manifest, Result};
use upm_release_git::{
    prepare_repository, CommitishResolver, GitRunner, RepoIdentity, ResolvedTarget, SplitMode,
    TagCatalog,
};

/// Everything a release run needs, resolved from flags, config and CI context
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// Workspace root
    pub workspace: PathBuf,
    /// Manifest glob, relative to the workspace
    pub manifest_glob: String,
    /// Split or direct mode
    pub split: SplitMode,
    /// Remote receiving the split branch
    pub remote: String,
    /// Leave the repository configuration, branches and HEAD untouched
    pub dry_run: bool,
    /// Release title template
    pub title: String,
    /// Committer identity
    pub identity: RepoIdentity,
    /// Fetch remote tags before building the catalog
    pub fetch_tags: bool,
    /// Caller-supplied release notes
    pub explicit_notes: Option<String>,
    /// Commit that triggered the run
    pub triggering_sha: Option<String>,
    /// Repository for changelog links
    pub repository: RepoSlug,
    /// Web base URL for changelog links
    pub server_url: String,
    /// Actor fallbacks for the notes credit line
    pub actors: ActorFallbacks,
}

/// Outcome of the planning phase
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
    /// Package being released
    pub package: PackageIdentity,
    /// Manifest the package was read from
    pub manifest_path: PathBuf,
    /// Directory holding the manifest
    pub package_dir: PathBuf,
    /// Most recent release tag
    pub previous_tag: Option<String>,
}

/// A release ready to be packaged and published
#[derive(Debug, Clone)]
pub struct PreparedRelease {
    /// Plan this release was prepared from
    pub plan: ReleasePlan,
    /// Resolved target commit
    pub target: ResolvedTarget,
    /// Composed notes
    pub notes: ComposedNotes,
    /// Release request sent to the platform
    pub release: NewRelease,
}

impl PreparedRelease {
    /// Summary of this release before publishing
    pub fn result(&self) -> ReleaseResult {
        ReleaseResult::new(
            self.plan.package.clone(),
            &self.target.commitish,
            &self.notes.notes,
        )
        .with_previous_tag(self.plan.previous_tag.clone())
    }
}

/// Pull-request source used without credentials; authors are never known
pub struct OfflinePullRequests;

#[async_trait::async_trait]
impl PullRequestSource for OfflinePullRequests {
    async fn pull_request(&self, number: u64) -> std::result::Result<PullRequest, PlatformError> {
        Ok(PullRequest {
            number,
            author: None,
        })
    }
}

/// Drives a release through its phases
pub struct ReleaseWorkflow<'a> {
    git: &'a dyn GitRunner,
    settings: &'a ReleaseSettings,
}

impl<'a> ReleaseWorkflow<'a> {
    /// Create a workflow over a repository
    pub fn new(git: &'a dyn GitRunner, settings: &'a ReleaseSettings) -> Self {
        Self { git, settings }
    }

    /// Prepare the repository, read the manifest and check the version is new
    #[instrument(skip(self), fields(workspace = %self.settings.workspace.display()))]
    pub async fn plan(&self) -> Result<ReleasePlan> {
        let settings = self.settings;
        let identity = (!settings.dry_run).then_some(&settings.identity);
        prepare_repository(self.git, identity, settings.fetch_tags).await?;

        let manifest_path = find_manifest(&settings.workspace, &settings.manifest_glob)?;
        let package = load_manifest(&manifest_path)?;
        let package_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| settings.workspace.clone());
        info!(package_dir = %package_dir.display(), "Package directory");

        let catalog = TagCatalog::load(self.git).await?;
        if catalog.contains(&package.version) {
            return Err(ConfigError::VersionAlreadyTagged {
                name: package.name,
                version: package.version,
            }
            .into());
        }

        info!(package = %package, "Generating Release for {}...", package);
        Ok(ReleasePlan {
            previous_tag: catalog.previous_tag().map(str::to_string),
            package,
            manifest_path,
            package_dir,
        })
    }

    /// Resolve the target commit and compose the release notes
    #[instrument(skip(self, plan, pull_requests), fields(package = %plan.package))]
    pub async fn prepare(
        &self,
        plan: &ReleasePlan,
        pull_requests: &dyn PullRequestSource,
    ) -> Result<PreparedRelease> {
        let settings = self.settings;

        let mut resolver = CommitishResolver::new(self.git, settings.split.clone())
            .with_remote(settings.remote.as_str());
        if settings.dry_run {
            resolver = resolver.dry_run();
        }
        let target = resolver
            .resolve(
                &settings.workspace,
                &plan.package_dir,
                &plan.manifest_path,
                settings.triggering_sha.as_deref(),
            )
            .await?;

        let request = ComposeRequest {
            package: plan.package.clone(),
            explicit_notes: settings.explicit_notes.clone(),
            last_tag: plan.previous_tag.clone(),
            commitish: target.commitish.clone(),
            repository: settings.repository.clone(),
            server_url: settings.server_url.clone(),
            actors: settings.actors.clone(),
        };
        let notes = ChangelogComposer::new(self.git, pull_requests)
            .compose(&request)
            .await?;

        let release = NewRelease {
            tag_name: plan.package.version.clone(),
            name: plan.package.render(&settings.title),
            body: notes.notes.clone(),
            target_commitish: target.commitish.clone(),
            prerelease: plan.package.is_prerelease(),
        };

        Ok(PreparedRelease {
            plan: plan.clone(),
            target,
            notes,
            release,
        })
    }

    /// Package the archive, create the release and upload the archive
    #[instrument(skip_all, fields(tag = %prepared.release.tag_name))]
    pub async fn publish(
        &self,
        prepared: &PreparedRelease,
        platform: &dyn ReleasePlatform,
        packager: &dyn Packager,
        output_dir: &Path,
    ) -> Result<ReleaseResult> {
        let start = Instant::now();
        let archive = packager.pack(&prepared.target.package_dir, output_dir).await?;
        info!(archive = %archive.display(), "Signed package created");

        let published = platform.create_release(&prepared.release).await?;
        info!(url = %published.html_url, "Release created");

        let asset = platform.upload_asset(&published, &archive).await?;
        info!(
            url = %asset.browser_download_url,
            duration_ms = start.elapsed().as_millis(),
            "Release asset uploaded"
        );

        Ok(prepared
            .result()
            .with_release_url(published.html_url)
            .with_asset_url(asset.browser_download_url))
    }
}
