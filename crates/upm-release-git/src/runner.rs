//! The version control accessor seam

use upm_release_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Runs git subcommands against one working tree.
///
/// Implementations return captured standard output. A non-zero exit is a
/// [`GitError::CommandFailed`] carrying the captured standard error. When
/// `warn_on_error` is set, standard error from a successful command is
/// surfaced as a warning instead of being dropped.
#[async_trait::async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>`
    async fn run(&self, args: &[&str], warn_on_error: bool) -> Result<String>;

    /// Run `git <args>`, ignoring standard error on success
    async fn git(&self, args: &[&str]) -> Result<String> {
        self.run(args, false).await
    }
}
