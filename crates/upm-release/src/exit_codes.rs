//! Exit codes for the CLI

use upm_release_core::error::{
    ChangelogError, ConfigError, GitError, PackagingError, PlatformError, UpmReleaseError,
};
use upm_release_github::GitHubError;

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Git error
pub const GIT_ERROR: u8 = 3;

/// Release platform error
pub const PLATFORM_ERROR: u8 = 6;

/// Packaging error
pub const PACKAGING_ERROR: u8 = 7;

/// Exit code for a failed run
pub fn for_error(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<UpmReleaseError>() {
        return match err {
            UpmReleaseError::Config(_) => CONFIG_ERROR,
            UpmReleaseError::Git(_) | UpmReleaseError::Changelog(_) => GIT_ERROR,
            UpmReleaseError::Platform(_) => PLATFORM_ERROR,
            UpmReleaseError::Packaging(_) => PACKAGING_ERROR,
            UpmReleaseError::Toml(_) => CONFIG_ERROR,
            _ => ERROR,
        };
    }

    if err.is::<ConfigError>() {
        CONFIG_ERROR
    } else if err.is::<GitError>() || err.is::<ChangelogError>() {
        GIT_ERROR
    } else if err.is::<PlatformError>() || err.is::<GitHubError>() {
        PLATFORM_ERROR
    } else if err.is::<PackagingError>() {
        PACKAGING_ERROR
    } else {
        ERROR
    }
}
