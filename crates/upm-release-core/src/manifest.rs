//! Package manifest discovery and parsing

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{ConfigError, Result};
use crate::types::PackageIdentity;

/// Default glob used to locate the package manifest
pub const DEFAULT_MANIFEST_GLOB: &str = "**/Packages/**/package.json";

/// The fields of `package.json` we consume
#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
}

/// Find the single manifest matching `pattern` under `root`.
///
/// Relative patterns are resolved against `root`. Zero or multiple matches
/// are configuration errors.
#[instrument(fields(root = %root.display(), pattern))]
pub fn find_manifest(root: &Path, pattern: &str) -> Result<PathBuf> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
    };
    debug!(full_pattern, "globbing for manifest");

    let entries = glob::glob(&full_pattern).map_err(|e| ConfigError::InvalidValue {
        field: "package-json".to_string(),
        message: e.to_string(),
    })?;

    let mut matches: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Err(ConfigError::ManifestNotFound(pattern.to_string()).into()),
        1 => {
            let path = matches.remove(0);
            info!(path = %path.display(), "found package manifest");
            Ok(path)
        }
        count => Err(ConfigError::MultipleManifests {
            pattern: pattern.to_string(),
            count,
        }
        .into()),
    }
}

/// Read the package identity from a manifest file
#[instrument(fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> Result<PackageIdentity> {
    let unreadable = || ConfigError::ManifestUnreadable(path.to_path_buf());

    let metadata = std::fs::metadata(path).map_err(|_| unreadable())?;
    if !metadata.is_file() {
        return Err(unreadable().into());
    }
    let content = std::fs::read_to_string(path).map_err(|_| unreadable())?;

    let manifest: PackageJson = serde_json::from_str(&content).map_err(|e| {
        ConfigError::ParseError(format!("{}: {}", path.display(), e))
    })?;

    let name = manifest
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("name".to_string()))?;
    let version = manifest
        .version
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("version".to_string()))?;

    semver::Version::parse(&version).map_err(|e| ConfigError::InvalidVersion {
        version: version.clone(),
        reason: e.to_string(),
    })?;

    let identity = PackageIdentity::new(name, version);
    info!(name = %identity.name, version = %identity.version, "loaded package manifest");
    Ok(identity)
}
