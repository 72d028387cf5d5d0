//! Unity editor discovery

use std::path::{Path, PathBuf};

use tracing::debug;

use upm_release_core::error::PackagingError;

/// Environment variable naming the editor executable
pub const EDITOR_ENV: &str = "UNITY_EDITOR_PATH";

/// Executable names searched on `PATH`
const EDITOR_BINARIES: &[&str] = &["Unity", "unity-editor"];

/// Locate the editor executable.
///
/// An explicitly configured path wins, then the `UNITY_EDITOR_PATH` value,
/// then the first editor binary found on `PATH`. Explicit paths that do not
/// exist are an error rather than a reason to keep searching.
pub fn locate_editor(
    configured: Option<&Path>,
    env_path: Option<&str>,
) -> Result<PathBuf, PackagingError> {
    if let Some(path) = configured {
        return existing(path, "configured editor");
    }

    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return existing(Path::new(path.trim()), EDITOR_ENV);
    }

    for name in EDITOR_BINARIES {
        if let Ok(path) = which::which(name) {
            debug!(path = %path.display(), "found editor on PATH");
            return Ok(path);
        }
    }

    Err(PackagingError::EditorNotFound(format!(
        "set [unity] editor, --unity-editor or {EDITOR_ENV}, or put {} on PATH",
        EDITOR_BINARIES.join(" or ")
    )))
}

fn existing(path: &Path, source: &str) -> Result<PathBuf, PackagingError> {
    if path.is_file() {
        debug!(path = %path.display(), source, "using editor");
        Ok(path.to_path_buf())
    } else {
        Err(PackagingError::EditorNotFound(format!(
            "{} ({source}) does not exist",
            path.display()
        )))
    }
}
