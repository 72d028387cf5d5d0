//! Real-repository fixtures for tests

use std::path::Path;

use tempfile::TempDir;

use crate::repository::SystemGit;
use crate::runner::GitRunner;

/// Initialize an empty repository with a local identity
pub(crate) async fn init_repo() -> (TempDir, SystemGit) {
    let temp = TempDir::new().unwrap();
    let git = SystemGit::new(temp.path());
    git.git(&["init", "--quiet"]).await.unwrap();
    git.git(&["config", "user.name", "Test"]).await.unwrap();
    git.git(&["config", "user.email", "test@example.com"]).await.unwrap();
    git.git(&["config", "commit.gpgsign", "false"]).await.unwrap();
    git.git(&["config", "tag.gpgsign", "false"]).await.unwrap();
    (temp, git)
}

/// Write `content` to `rel` and commit it, returning the new HEAD
pub(crate) async fn commit_file(
    git: &SystemGit,
    root: &Path,
    rel: &str,
    content: &str,
    message: &str,
) -> String {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    git.git(&["add", rel]).await.unwrap();
    git.git(&["commit", "--quiet", "-m", message]).await.unwrap();
    git.git(&["rev-parse", "HEAD"]).await.unwrap().trim().to_string()
}
