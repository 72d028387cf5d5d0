//! Git types

use serde::{Deserialize, Serialize};

/// A release tag and the commit it ultimately points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name (e.g. `1.2.3` or `v1.2.3`)
    pub name: String,
    /// Peeled commit hash
    pub commit_hash: String,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_hash: commit_hash.into(),
        }
    }

    /// Short hash (first 7 characters)
    pub fn short_hash(&self) -> &str {
        let end = self
            .commit_hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.commit_hash.len());
        &self.commit_hash[..end]
    }
}
