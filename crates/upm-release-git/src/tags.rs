//! Release tag catalog

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::runner::{GitRunner, Result};
use crate::types::TagInfo;

fn release_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v?\d+\.\d+\.\d+$").expect("release tag pattern is valid"))
}

/// Whether `tag` is a strict `MAJOR.MINOR.PATCH` tag, optionally `v`-prefixed
pub fn is_release_tag(tag: &str) -> bool {
    release_tag_regex().is_match(tag)
}

/// Keep the release tags of a `git tag --list` listing, preserving its order
pub fn filter_release_tags(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| is_release_tag(tag))
        .collect()
}

/// Resolve the commit a ref ultimately points to, peeling annotated tags
pub async fn peel(git: &dyn GitRunner, reference: &str) -> Result<String> {
    let revspec = format!("{}^{{}}", reference);
    let output = git.git(&["rev-parse", "--verify", &revspec]).await?;
    Ok(output.trim().to_string())
}

/// Release tags in ascending version order, each with its peeled commit.
///
/// Order comes from git's version-aware `version:refname` sort, not from tag
/// creation time. The catalog is rebuilt on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCatalog {
    entries: Vec<TagInfo>,
}

impl TagCatalog {
    /// Build the catalog from the repository's current tags
    #[instrument(skip(git))]
    pub async fn load(git: &dyn GitRunner) -> Result<Self> {
        let listing = git
            .git(&["tag", "--list", "--sort=version:refname"])
            .await?;

        let names = filter_release_tags(&listing);
        debug!(count = names.len(), "filtered release tags");

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let commit = peel(git, name).await?;
            entries.push(TagInfo::new(name, commit));
        }

        let catalog = Self { entries };
        info!(
            count = catalog.len(),
            previous = ?catalog.previous_tag(),
            "loaded tag catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from already-ordered entries
    pub fn from_entries(entries: Vec<TagInfo>) -> Self {
        Self { entries }
    }

    /// Whether a tag with exactly this name exists
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|e| e.name == tag)
    }

    /// Peeled commit for a tag
    pub fn commit_for(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == tag)
            .map(|e| e.commit_hash.as_str())
    }

    /// The most recent prior release: the last entry in catalog order
    pub fn previous_tag(&self) -> Option<&str> {
        self.entries.last().map(|e| e.name.as_str())
    }

    /// Entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &TagInfo> {
        self.entries.iter()
    }

    /// Number of release tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no release tags
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
