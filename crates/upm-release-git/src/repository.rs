//! System git backend

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use upm_release_core::error::GitError;

use crate::runner::{GitRunner, Result};

/// Runs the `git` binary inside a working tree.
///
/// Calls are serialized: the working tree and its index are mutated in place
/// (checkout, subtree split), so two commands never run at the same time.
pub struct SystemGit {
    work_tree: PathBuf,
    lock: Mutex<()>,
}

impl SystemGit {
    /// Use `work_tree` as the repository root without checking it
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
            lock: Mutex::new(()),
        }
    }

    /// Discover the repository containing `start_path`
    #[instrument(fields(start_path = %start_path.display()))]
    pub async fn discover(start_path: &Path) -> Result<Self> {
        info!(start_path = %start_path.display(), "discovering git repository");
        let candidate = Self::new(start_path);
        let top_level = candidate
            .git(&["rev-parse", "--show-toplevel"])
            .await
            .map_err(|e| match e {
                GitError::CommandFailed { .. } => GitError::NotARepository(start_path.to_path_buf()),
                other => other,
            })?;

        Ok(Self::new(top_level.trim()))
    }

    /// The working tree this runner operates on
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }
}

#[async_trait::async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, args: &[&str], warn_on_error: bool) -> Result<String> {
        let _guard = self.lock.lock().await;
        let start = std::time::Instant::now();
        debug!(args = ?args, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_tree)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                command: args.join(" "),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            args = ?args,
            success = output.status.success(),
            duration_ms = start.elapsed().as_millis(),
            "git finished"
        );

        if !output.status.success() {
            let message = if stderr.trim().is_empty() {
                format!("git {} exited with {}", args.join(" "), output.status)
            } else {
                stderr.trim_end().to_string()
            };
            return Err(GitError::command_failed(args, message));
        }

        if warn_on_error && !stderr.trim().is_empty() {
            warn!(command = %args.join(" "), "{}", stderr.trim_end());
        }

        Ok(stdout)
    }
}
