//! Commit lookups

use crate::runner::{GitRunner, Result};

/// Full message body of a commit, trimmed
pub async fn commit_message(git: &dyn GitRunner, commitish: &str) -> Result<String> {
    let output = git.git(&["log", "-1", "--pretty=%B", commitish]).await?;
    Ok(output.trim().to_string())
}

/// Resolve a revision to a commit hash
pub async fn rev_parse(git: &dyn GitRunner, rev: &str) -> Result<String> {
    let output = git.git(&["rev-parse", rev]).await?;
    Ok(output.trim().to_string())
}
