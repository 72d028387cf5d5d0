//! upm-release Git - git operations for release automation
//!
//! This crate runs git subcommands through the [`GitRunner`] seam, builds the
//! release tag catalog, and resolves the commit a release is attached to,
//! optionally after splitting the package directory into its own branch.

mod commits;
mod commitish;
mod remote;
mod repository;
mod runner;
mod tags;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod fixtures;

pub use commits::{commit_message, rev_parse};
pub use commitish::{split_prefix, CommitishResolver, ResolvedTarget, SplitMode};
pub use remote::{prepare_repository, push_branch, RepoIdentity};
pub use repository::SystemGit;
pub use runner::{GitRunner, Result};
pub use tags::{filter_release_tags, is_release_tag, peel, TagCatalog};
pub use types::TagInfo;
