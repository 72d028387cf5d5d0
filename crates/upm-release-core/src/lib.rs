//! upm-release Core - shared foundation for release automation
//!
//! This crate provides the error taxonomy, configuration loading, CI context,
//! manifest discovery, and the trait seams (release platform, pull-request
//! lookup, packaging tool) that the other upm-release crates build on.

pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod types;

pub use context::CiContext;
pub use error::{Result, UpmReleaseError};
pub use manifest::{find_manifest, load_manifest};
pub use platform::{Packager, PullRequestSource, ReleasePlatform};
pub use types::{PackageIdentity, RepoSlug};
