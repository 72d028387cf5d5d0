//! Error types for upm-release

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using UpmReleaseError
pub type Result<T> = std::result::Result<T, UpmReleaseError>;

/// Main error type for upm-release operations
#[derive(Debug, Error)]
pub enum UpmReleaseError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Release platform errors
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Packaging tool errors
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// No credential for the release platform
    #[error("GitHub token is required to create a release. Please ensure your workflow enables permissions for GITHUB_TOKEN or pass a personal access token.")]
    MissingToken,

    /// The manifest glob matched nothing
    #[error("No package.json file found matching '{0}'")]
    ManifestNotFound(String),

    /// The manifest glob matched more than one file
    #[error("Multiple package.json files ({count}) found matching '{pattern}'. Please ensure there is only one package.json file.")]
    MultipleManifests { pattern: String, count: usize },

    /// The manifest exists but cannot be used
    #[error("package.json file not found or is not readable: {0}")]
    ManifestUnreadable(PathBuf),

    /// The manifest version is not semver
    #[error("Invalid package version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// The manifest version was already released
    #[error("Tag for {name} {version} already exists. Please ensure the package version is updated for a new release.")]
    VersionAlreadyTagged { name: String, version: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// A git subprocess exited with a non-zero status
    #[error("{stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The git binary could not be started
    #[error("Failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Subtree split prefix is unusable
    #[error("Cannot split '{0}': the package directory must be a subdirectory of the workspace")]
    InvalidSplitPrefix(PathBuf),

    /// Command produced output that could not be interpreted
    #[error("Unexpected output from git {command}: {output}")]
    UnexpectedOutput { command: String, output: String },
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Commit message could not be read
    #[error("Failed to read commit message for {commitish}: {source}")]
    CommitMessage {
        commitish: String,
        #[source]
        source: GitError,
    },
}

/// Release platform errors
#[derive(Debug, Error)]
pub enum PlatformError {
    /// API answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Asset upload failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// IO error reading an asset
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Packaging tool errors
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Editor executable could not be located
    #[error("Unity editor not found: {0}")]
    EditorNotFound(String),

    /// Tool exited with failure
    #[error("{tool} failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// No archive appeared in the output directory
    #[error("Signed .tgz file not found in the output directory {0}")]
    NoArtifact(PathBuf),

    /// More than one archive appeared in the output directory
    #[error("Expected exactly one .tgz file in {dir}, found {count}")]
    MultipleArtifacts { dir: PathBuf, count: usize },
}

impl GitError {
    /// Build a command failure from a git argument list and its stderr
    pub fn command_failed(args: &[&str], stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: args.join(" "),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message_is_stderr() {
        let err = GitError::command_failed(&["rev-parse", "HEAD"], "fatal: bad revision 'HEAD'");
        assert_eq!(err.to_string(), "fatal: bad revision 'HEAD'");
        assert!(matches!(err, GitError::CommandFailed { ref command, .. } if command == "rev-parse HEAD"));
    }

    #[test]
    fn test_transparent_wrapping() {
        let err: UpmReleaseError = ConfigError::VersionAlreadyTagged {
            name: "com.example.pkg".to_string(),
            version: "1.0.0".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Tag for com.example.pkg 1.0.0 already exists"));
    }
}
