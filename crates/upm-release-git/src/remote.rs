//! Repository preparation and remote operations

use tracing::{info, instrument};

use crate::runner::{GitRunner, Result};

/// Committer identity configured before the repository is mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// `user.name`
    pub name: String,
    /// `user.email`
    pub email: String,
}

/// Configure the committer identity and optionally fetch every remote tag.
///
/// Without an identity the repository configuration is left untouched.
#[instrument(skip(git, identity), fields(configure_identity = identity.is_some(), fetch_tags))]
pub async fn prepare_repository(
    git: &dyn GitRunner,
    identity: Option<&RepoIdentity>,
    fetch_tags: bool,
) -> Result<()> {
    if let Some(identity) = identity {
        git.git(&["config", "user.name", &identity.name]).await?;
        git.git(&["config", "user.email", &identity.email]).await?;
    }

    if fetch_tags {
        let start = std::time::Instant::now();
        git.git(&["fetch", "--tags", "--force"]).await?;
        info!(duration_ms = start.elapsed().as_millis(), "fetched tags");
    }

    Ok(())
}

/// Force-push a branch, setting its upstream.
///
/// Push reports progress on stderr even when it succeeds, so stderr is
/// surfaced as a warning rather than ignored.
#[instrument(skip(git), fields(remote, branch))]
pub async fn push_branch(git: &dyn GitRunner, remote: &str, branch: &str) -> Result<()> {
    let start = std::time::Instant::now();
    git.run(&["push", "-u", remote, branch, "--force"], true)
        .await?;
    info!(
        remote,
        branch,
        duration_ms = start.elapsed().as_millis(),
        "force-pushed branch"
    );
    Ok(())
}
