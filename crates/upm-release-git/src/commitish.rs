//! Release target resolution
//!
//! A release points either at the triggering commit (direct mode) or at the
//! head of a branch produced by splitting the package directory out of the
//! repository (split mode). In split mode the branch root *is* the package,
//! so the package directory and manifest move to the workspace root.
//!
//! A dry run computes the split commit without creating the branch, pushing
//! it or checking it out, so the caller's checkout is left as it was.

use std::path::{Component, Path, PathBuf};

use tracing::{info, instrument, warn};

use upm_release_core::config::SPLIT_DISABLED;
use upm_release_core::error::GitError;

use crate::commits::rev_parse;
use crate::remote::push_branch;
use crate::runner::{GitRunner, Result};

/// How the release target is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// Release the triggering commit as-is
    Direct,
    /// Split the package directory into `branch` and release its head
    Split {
        /// Branch receiving the split history
        branch: String,
    },
}

impl SplitMode {
    /// Interpret a split-branch setting; `none` (any case) disables splitting
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(SPLIT_DISABLED) {
            Self::Direct
        } else {
            Self::Split {
                branch: value.to_string(),
            }
        }
    }

    /// Branch name in split mode
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Direct => None,
            Self::Split { branch } => Some(branch),
        }
    }
}

/// Where the release points and where the package now lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Commit hash the release is attached to
    pub commitish: String,
    /// Package directory to hand to the packaging tool
    pub package_dir: PathBuf,
    /// Manifest path after resolution
    pub manifest_path: PathBuf,
    /// Split branch that was produced, if any (never set on dry runs)
    pub split_branch: Option<String>,
}

/// Path of `package_dir` relative to `workspace`, with `/` separators.
///
/// Fails when the package directory is the workspace itself or lies outside
/// it: a subtree split needs a real subdirectory prefix.
pub fn split_prefix(workspace: &Path, package_dir: &Path) -> Result<String> {
    let relative = package_dir
        .strip_prefix(workspace)
        .map_err(|_| GitError::InvalidSplitPrefix(package_dir.to_path_buf()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(GitError::InvalidSplitPrefix(package_dir.to_path_buf())),
        }
    }

    if parts.is_empty() {
        return Err(GitError::InvalidSplitPrefix(package_dir.to_path_buf()));
    }
    Ok(parts.join("/"))
}

/// Decides which commit a release is attached to
pub struct CommitishResolver<'a> {
    git: &'a dyn GitRunner,
    mode: SplitMode,
    remote: String,
    dry_run: bool,
}

impl<'a> CommitishResolver<'a> {
    /// Create a resolver pushing split branches to `origin`
    pub fn new(git: &'a dyn GitRunner, mode: SplitMode) -> Self {
        Self {
            git,
            mode,
            remote: "origin".to_string(),
            dry_run: false,
        }
    }

    /// Push split branches to another remote
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Resolve without creating, pushing or checking out the split branch
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Resolve the release target.
    ///
    /// `triggering_sha` is the commit from the CI event; `HEAD` is used when
    /// it is absent. Split mode ignores it and releases the split head.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn resolve(
        &self,
        workspace: &Path,
        package_dir: &Path,
        manifest_path: &Path,
        triggering_sha: Option<&str>,
    ) -> Result<ResolvedTarget> {
        let target = match &self.mode {
            SplitMode::Direct => {
                let commitish = match triggering_sha.map(str::trim).filter(|s| !s.is_empty()) {
                    Some(sha) => sha.to_string(),
                    None => rev_parse(self.git, "HEAD").await?,
                };
                ResolvedTarget {
                    commitish,
                    package_dir: package_dir.to_path_buf(),
                    manifest_path: manifest_path.to_path_buf(),
                    split_branch: None,
                }
            }
            SplitMode::Split { .. } if self.dry_run => {
                self.preview_split(workspace, package_dir, manifest_path).await?
            }
            SplitMode::Split { branch } => self.split(workspace, package_dir, branch).await?,
        };

        info!(commitish = %target.commitish, "using target commit for the release");
        Ok(target)
    }

    // Order matters: split, push, resolve, checkout.
    async fn split(&self, workspace: &Path, package_dir: &Path, branch: &str) -> Result<ResolvedTarget> {
        let prefix = split_prefix(workspace, package_dir)?;
        info!(prefix, branch, "splitting package into branch");

        if self.local_branch_exists(branch).await? {
            warn!(branch, "local split branch exists, recreating it");
            self.git.git(&["branch", "-D", branch]).await?;
        }

        self.git
            .git(&["subtree", "split", "--prefix", &prefix, "-b", branch])
            .await?;
        push_branch(self.git, &self.remote, branch).await?;

        let commitish = rev_parse(self.git, branch).await?;
        self.git.git(&["checkout", &commitish]).await?;

        Ok(ResolvedTarget {
            commitish,
            package_dir: workspace.to_path_buf(),
            manifest_path: workspace.join("package.json"),
            split_branch: Some(branch.to_string()),
        })
    }

    // `subtree split` without `-b` only prints the split head.
    async fn preview_split(
        &self,
        workspace: &Path,
        package_dir: &Path,
        manifest_path: &Path,
    ) -> Result<ResolvedTarget> {
        let prefix = split_prefix(workspace, package_dir)?;
        info!(prefix, "computing split head without creating the branch");

        let output = self.git.git(&["subtree", "split", "--prefix", &prefix]).await?;
        let commitish = output
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| GitError::UnexpectedOutput {
                command: format!("subtree split --prefix {prefix}"),
                output: output.clone(),
            })?
            .to_string();

        Ok(ResolvedTarget {
            commitish,
            package_dir: package_dir.to_path_buf(),
            manifest_path: manifest_path.to_path_buf(),
            split_branch: None,
        })
    }

    async fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{}", branch);
        match self
            .git
            .git(&["show-ref", "--verify", "--quiet", &reference])
            .await
        {
            Ok(_) => Ok(true),
            Err(GitError::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commit_file, init_repo};
    use crate::testing::ScriptedGit;
    use tempfile::TempDir;

    const SHOW_REF: &str = "show-ref --verify --quiet refs/heads/upm";

    #[test]
    fn test_split_mode_from_setting() {
        assert_eq!(SplitMode::from_setting("none"), SplitMode::Direct);
        assert_eq!(SplitMode::from_setting("NoNe"), SplitMode::Direct);
        assert_eq!(SplitMode::from_setting(""), SplitMode::Direct);
        assert_eq!(
            SplitMode::from_setting("upm"),
            SplitMode::Split {
                branch: "upm".to_string()
            }
        );
        assert_eq!(SplitMode::from_setting("upm").branch(), Some("upm"));
    }

    #[test]
    fn test_split_prefix() {
        let ws = Path::new("/work/repo");
        assert_eq!(
            split_prefix(ws, Path::new("/work/repo/Packages/com.example.tools")).unwrap(),
            "Packages/com.example.tools"
        );
        assert!(matches!(
            split_prefix(ws, ws),
            Err(GitError::InvalidSplitPrefix(_))
        ));
        assert!(matches!(
            split_prefix(ws, Path::new("/elsewhere/pkg")),
            Err(GitError::InvalidSplitPrefix(_))
        ));
    }

    #[tokio::test]
    async fn test_direct_mode_uses_triggering_sha() {
        let git = ScriptedGit::new();
        let resolver = CommitishResolver::new(&git, SplitMode::Direct);

        let target = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/pkg"),
                Path::new("/ws/Packages/pkg/package.json"),
                Some("abc123\n"),
            )
            .await
            .unwrap();

        assert_eq!(target.commitish, "abc123");
        assert_eq!(target.package_dir, PathBuf::from("/ws/Packages/pkg"));
        assert!(target.split_branch.is_none());
        assert!(git.commands().is_empty());
    }

    #[tokio::test]
    async fn test_direct_mode_falls_back_to_head() {
        let git = ScriptedGit::new().on("rev-parse HEAD", "def456\n");
        let resolver = CommitishResolver::new(&git, SplitMode::Direct);

        let target = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/pkg"),
                Path::new("/ws/Packages/pkg/package.json"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(target.commitish, "def456");
        assert_eq!(git.commands(), vec!["rev-parse HEAD"]);
    }

    #[tokio::test]
    async fn test_split_mode_sequence() {
        let git = ScriptedGit::new()
            .on_fail(SHOW_REF, "")
            .on("rev-parse upm", "5p1175ha\n");
        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm"));

        let target = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/com.example.tools"),
                Path::new("/ws/Packages/com.example.tools/package.json"),
                Some("ignored"),
            )
            .await
            .unwrap();

        assert_eq!(
            git.commands(),
            vec![
                SHOW_REF,
                "subtree split --prefix Packages/com.example.tools -b upm",
                "push -u origin upm --force",
                "rev-parse upm",
                "checkout 5p1175ha",
            ]
        );
        assert_eq!(target.commitish, "5p1175ha");
        assert_eq!(target.package_dir, PathBuf::from("/ws"));
        assert_eq!(target.manifest_path, PathBuf::from("/ws/package.json"));
        assert_eq!(target.split_branch.as_deref(), Some("upm"));
    }

    #[tokio::test]
    async fn test_split_mode_rerun_recreates_branch() {
        let git = ScriptedGit::new()
            .on_fail(SHOW_REF, "")
            .on(SHOW_REF, "")
            .on("rev-parse upm", "5p1175ha\n");
        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm"));
        let ws = Path::new("/ws");
        let pkg = Path::new("/ws/Packages/pkg");
        let manifest = Path::new("/ws/Packages/pkg/package.json");

        let first = resolver.resolve(ws, pkg, manifest, None).await.unwrap();
        let second = resolver.resolve(ws, pkg, manifest, None).await.unwrap();

        assert_eq!(first, second);
        let commands = git.commands();
        assert_eq!(commands.iter().filter(|c| *c == "branch -D upm").count(), 1);
        assert_eq!(
            commands.iter().filter(|c| c.starts_with("push ")).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_split_failure_is_fatal() {
        let git = ScriptedGit::new()
            .on_fail(SHOW_REF, "")
            .on_fail(
                "subtree split --prefix Packages/pkg -b upm",
                "No new revisions were found",
            );
        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm"));

        let err = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/pkg"),
                Path::new("/ws/Packages/pkg/package.json"),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No new revisions were found");
        assert!(!git.commands().iter().any(|c| c.starts_with("push")));
    }

    #[tokio::test]
    async fn test_dry_run_split_only_computes_head() {
        let git = ScriptedGit::new().on("subtree split --prefix Packages/pkg", "abc\n");
        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm"))
            .with_remote("upstream")
            .dry_run();

        let target = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/pkg"),
                Path::new("/ws/Packages/pkg/package.json"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(git.commands(), vec!["subtree split --prefix Packages/pkg"]);
        assert_eq!(target.commitish, "abc");
        assert_eq!(target.package_dir, PathBuf::from("/ws/Packages/pkg"));
        assert_eq!(target.split_branch, None);
    }

    #[tokio::test]
    async fn test_dry_run_split_without_output_fails() {
        let git = ScriptedGit::new().on("subtree split --prefix Packages/pkg", "\n");
        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm")).dry_run();

        let err = resolver
            .resolve(
                Path::new("/ws"),
                Path::new("/ws/Packages/pkg"),
                Path::new("/ws/Packages/pkg/package.json"),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, GitError::UnexpectedOutput { .. }));
    }

    async fn subtree_available(git: &dyn GitRunner) -> bool {
        match git.git(&["subtree"]).await {
            Ok(_) => true,
            Err(GitError::CommandFailed { stderr, .. }) => !stderr.contains("is not a git command"),
            Err(_) => false,
        }
    }

    #[tokio::test]
    async fn test_split_twice_against_real_remote() {
        let (temp, git) = init_repo().await;
        if !subtree_available(&git).await {
            eprintln!("git subtree not installed, skipping");
            return;
        }

        let remote_dir = TempDir::new().unwrap();
        let remote = crate::repository::SystemGit::new(remote_dir.path());
        remote.git(&["init", "--bare", "--quiet"]).await.unwrap();
        let remote_path = remote_dir.path().to_string_lossy().to_string();
        git.git(&["remote", "add", "origin", &remote_path]).await.unwrap();

        commit_file(&git, temp.path(), "README.md", "root", "root file").await;
        commit_file(
            &git,
            temp.path(),
            "Packages/pkg/package.json",
            r#"{"name":"pkg","version":"1.0.0"}"#,
            "add package",
        )
        .await;
        let main_head = git.git(&["rev-parse", "HEAD"]).await.unwrap().trim().to_string();

        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm"));
        let ws = temp.path();
        let pkg = temp.path().join("Packages").join("pkg");
        let manifest = pkg.join("package.json");

        let first = resolver.resolve(ws, &pkg, &manifest, None).await.unwrap();
        git.git(&["checkout", "--quiet", &main_head]).await.unwrap();
        let second = resolver.resolve(ws, &pkg, &manifest, None).await.unwrap();

        assert_eq!(first.commitish, second.commitish);
        assert!(temp.path().join("package.json").exists());

        let remote_head = remote.git(&["rev-parse", "refs/heads/upm"]).await.unwrap();
        assert_eq!(remote_head.trim(), second.commitish);

        let history = remote.git(&["rev-list", "--count", "refs/heads/upm"]).await.unwrap();
        assert_eq!(history.trim(), "1");
    }

    #[tokio::test]
    async fn test_dry_run_split_leaves_checkout_untouched() {
        let (temp, git) = init_repo().await;
        if !subtree_available(&git).await {
            eprintln!("git subtree not installed, skipping");
            return;
        }

        commit_file(&git, temp.path(), "README.md", "root", "root file").await;
        let head = commit_file(
            &git,
            temp.path(),
            "Packages/pkg/package.json",
            r#"{"name":"pkg","version":"1.0.0"}"#,
            "add package",
        )
        .await;
        let branch = git.git(&["symbolic-ref", "--short", "HEAD"]).await.unwrap();

        let resolver = CommitishResolver::new(&git, SplitMode::from_setting("upm")).dry_run();
        let pkg = temp.path().join("Packages").join("pkg");
        let target = resolver
            .resolve(temp.path(), &pkg, &pkg.join("package.json"), None)
            .await
            .unwrap();

        assert_ne!(target.commitish, head);
        let split_manifest = format!("{}:package.json", target.commitish);
        git.git(&["cat-file", "-e", &split_manifest]).await.unwrap();

        assert_eq!(git.git(&["rev-parse", "HEAD"]).await.unwrap().trim(), head);
        assert_eq!(
            git.git(&["symbolic-ref", "--short", "HEAD"]).await.unwrap(),
            branch
        );
        assert!(git
            .git(&["show-ref", "--verify", "--quiet", "refs/heads/upm"])
            .await
            .is_err());
        assert!(temp.path().join("README.md").exists());
    }
}
