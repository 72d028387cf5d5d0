//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_release(config)?;
    validate_git(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_release(config: &Config) -> Result<()> {
    let release = &config.release;

    if release.package_json.trim().is_empty() {
        return Err(invalid("release.package_json", "glob cannot be empty"));
    }

    if release.split_branch.trim().is_empty() {
        return Err(invalid(
            "release.split_branch",
            "branch cannot be empty (use \"none\" to disable splitting)",
        ));
    }

    if release.remote.trim().is_empty() {
        return Err(invalid("release.remote", "remote cannot be empty"));
    }

    if !release.title.contains("{version}") && !release.title.contains("{name}") {
        return Err(invalid(
            "release.title",
            "must contain a {name} or {version} placeholder",
        ));
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.user_name.trim().is_empty() {
        return Err(invalid("git.user_name", "user name cannot be empty"));
    }

    if config.git.user_email.trim().is_empty() {
        return Err(invalid("git.user_email", "user email cannot be empty"));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::UpmReleaseError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
