//! Changelog types

use serde::{Deserialize, Serialize};

use upm_release_core::types::{PackageIdentity, RepoSlug};

/// Result of parsing a commit message for a release line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedNotes {
    /// Pull-request number from the release line
    pub pr_number: Option<u64>,
    /// Free-form notes body
    pub body: String,
}

/// Actor names used when no pull-request author is available
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorFallbacks {
    /// Actor of the triggering CI event
    pub context_actor: Option<String>,
    /// Actor-name environment value
    pub env_actor: Option<String>,
}

/// Everything needed to compose release notes
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// Package being released
    pub package: PackageIdentity,
    /// Caller-supplied notes, used verbatim when present
    pub explicit_notes: Option<String>,
    /// Previous release tag
    pub last_tag: Option<String>,
    /// Commit whose message is parsed
    pub commitish: String,
    /// Repository for changelog links
    pub repository: RepoSlug,
    /// Web base URL for changelog links
    pub server_url: String,
    /// Actor fallbacks
    pub actors: ActorFallbacks,
}

/// Composed release notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedNotes {
    /// Final release notes
    pub notes: String,
    /// Pull request credited, if any
    pub pr_number: Option<u64>,
    /// Credited actor (absent for explicit notes)
    pub actor: Option<String>,
    /// Recoverable problems hit while composing
    pub warnings: Vec<String>,
}

impl ComposedNotes {
    /// Notes supplied verbatim by the caller
    pub fn verbatim(notes: impl Into<String>) -> Self {
        Self {
            notes: notes.into(),
            pr_number: None,
            actor: None,
            warnings: Vec::new(),
        }
    }
}
