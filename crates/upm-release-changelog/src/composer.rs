//! Release notes composition

use tracing::{debug, info, instrument, warn};

use upm_release_core::error::ChangelogError;
use upm_release_core::platform::PullRequestSource;
use upm_release_git::{commit_message, GitRunner};

use crate::formatter::{changelog_line, format_notes};
use crate::parser::extract_release_line;
use crate::types::{ActorFallbacks, ComposeRequest, ComposedNotes};

/// Actor credited when nothing else is known
pub const DEFAULT_ACTOR: &str = "github-actions[bot]";

/// Builds release notes from the target commit's message
pub struct ChangelogComposer<'a> {
    git: &'a dyn GitRunner,
    pull_requests: &'a dyn PullRequestSource,
}

impl<'a> ChangelogComposer<'a> {
    /// Create a composer
    pub fn new(git: &'a dyn GitRunner, pull_requests: &'a dyn PullRequestSource) -> Self {
        Self { git, pull_requests }
    }

    /// Compose the notes for a release.
    ///
    /// Explicit notes are returned unchanged. Only reading the commit message
    /// can fail; a failed pull-request lookup falls back to the CI actor.
    #[instrument(skip(self, request), fields(package = %request.package, commitish = %request.commitish))]
    pub async fn compose(&self, request: &ComposeRequest) -> Result<ComposedNotes, ChangelogError> {
        if let Some(notes) = request.explicit_notes.as_deref().filter(|n| !n.is_empty()) {
            debug!("using explicit release notes");
            return Ok(ComposedNotes::verbatim(notes));
        }

        let message = commit_message(self.git, &request.commitish)
            .await
            .map_err(|source| ChangelogError::CommitMessage {
                commitish: request.commitish.clone(),
                source,
            })?;

        let extracted = extract_release_line(&message, &request.package);
        let mut warnings = Vec::new();

        let author = match extracted.pr_number {
            Some(number) => self.pull_request_author(number, &mut warnings).await,
            None => None,
        };
        let actor = author.unwrap_or_else(|| fallback_actor(&request.actors));

        let changelog = changelog_line(
            &request.server_url,
            &request.repository,
            request.last_tag.as_deref(),
            &request.package.version,
        );
        let notes = format_notes(
            &request.package,
            &actor,
            extracted.pr_number,
            &extracted.body,
            &changelog,
        );

        info!(
            pr_number = ?extracted.pr_number,
            actor = %actor,
            "composed release notes"
        );

        Ok(ComposedNotes {
            notes,
            pr_number: extracted.pr_number,
            actor: Some(actor),
            warnings,
        })
    }

    async fn pull_request_author(&self, number: u64, warnings: &mut Vec<String>) -> Option<String> {
        match self.pull_requests.pull_request(number).await {
            Ok(pr) => pr.author.filter(|login| !login.is_empty()),
            Err(e) => {
                let message = format!("Failed to get PR #{number} details: {e}");
                warn!(pr_number = number, error = %e, "pull request lookup failed");
                warnings.push(message);
                None
            }
        }
    }
}

fn fallback_actor(actors: &ActorFallbacks) -> String {
    [&actors.context_actor, &actors.env_actor]
        .into_iter()
        .flatten()
        .find(|actor| !actor.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ACTOR.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use upm_release_core::error::PlatformError;
    use upm_release_core::platform::PullRequest;
    use upm_release_core::types::{PackageIdentity, RepoSlug};
    use upm_release_git::testing::ScriptedGit;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    /// Pull-request source answering from a fixed reply
    struct StubPullRequests {
        reply: Result<Option<String>, u16>,
        lookups: Mutex<Vec<u64>>,
    }

    impl StubPullRequests {
        fn author(login: Option<&str>) -> Self {
            Self {
                reply: Ok(login.map(str::to_string)),
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn lookups(&self) -> Vec<u64> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PullRequestSource for StubPullRequests {
        async fn pull_request(&self, number: u64) -> Result<PullRequest, PlatformError> {
            self.lookups.lock().unwrap().push(number);
            match &self.reply {
                Ok(author) => Ok(PullRequest {
                    number,
                    author: author.clone(),
                }),
                Err(status) => Err(PlatformError::Api {
                    status: *status,
                    message: "Not Found".to_string(),
                }),
            }
        }
    }

    fn request(version: &str, last_tag: Option<&str>) -> ComposeRequest {
        ComposeRequest {
            package: PackageIdentity::new("MyPkg", version),
            explicit_notes: None,
            last_tag: last_tag.map(str::to_string),
            commitish: SHA.to_string(),
            repository: RepoSlug::new("acme", "tools"),
            server_url: "https://github.com".to_string(),
            actors: ActorFallbacks {
                context_actor: Some("ci-actor".to_string()),
                env_actor: Some("env-actor".to_string()),
            },
        }
    }

    fn git_with_message(message: &str) -> ScriptedGit {
        ScriptedGit::new().on(&format!("log -1 --pretty=%B {SHA}"), message)
    }

    #[tokio::test]
    async fn test_compose_credits_pull_request_author() {
        let git = git_with_message("MyPkg v1.2.3 (#42)\n\nFixed a bug\n");
        let prs = StubPullRequests::author(Some("octocat"));

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.3", Some("1.2.2")))
            .await
            .unwrap();

        assert_eq!(prs.lookups(), vec![42]);
        assert_eq!(composed.pr_number, Some(42));
        assert_eq!(composed.actor.as_deref(), Some("octocat"));
        assert!(composed.warnings.is_empty());
        assert_eq!(
            composed.notes,
            "## What's Changed\n\
             - MyPkg 1.2.3 by @octocat in #42\n\
             \n  - Fixed a bug\n\
             \n**Full Changelog**: https://github.com/acme/tools/compare/1.2.2...1.2.3"
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back_to_context_actor() {
        let git = git_with_message("MyPkg v1.2.3 #42");
        let prs = StubPullRequests::failing(404);

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.3", None))
            .await
            .unwrap();

        assert_eq!(composed.actor.as_deref(), Some("ci-actor"));
        assert_eq!(composed.pr_number, Some(42));
        assert_eq!(composed.warnings.len(), 1);
        assert!(composed.warnings[0].contains("#42"));
        assert!(composed.notes.contains("by @ci-actor in #42"));
    }

    #[tokio::test]
    async fn test_missing_author_falls_back() {
        let git = git_with_message("MyPkg v1.2.3 #42");
        let prs = StubPullRequests::author(None);

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.3", None))
            .await
            .unwrap();

        assert_eq!(composed.actor.as_deref(), Some("ci-actor"));
        assert!(composed.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_no_release_line_skips_lookup() {
        let git = git_with_message("Update docs\n\nMore words");
        let prs = StubPullRequests::author(Some("octocat"));

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.0", Some("1.0.0")))
            .await
            .unwrap();

        assert!(prs.lookups().is_empty());
        assert_eq!(composed.pr_number, None);
        assert_eq!(
            composed.notes,
            "## What's Changed\n\
             - MyPkg 1.2.0 by @ci-actor\n\
             \n  - Update docs\n\
             \n  - More words\n\
             \n**Full Changelog**: https://github.com/acme/tools/compare/1.0.0...1.2.0"
        );
    }

    #[tokio::test]
    async fn test_first_release_links_commit_history() {
        let git = git_with_message("MyPkg v1.2.0 (#1)");
        let prs = StubPullRequests::author(Some("octocat"));

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.0", None))
            .await
            .unwrap();

        assert!(composed
            .notes
            .ends_with("**Full Changelog**: https://github.com/acme/tools/commits/1.2.0"));
        assert!(!composed.notes.contains("compare"));
    }

    #[tokio::test]
    async fn test_explicit_notes_are_verbatim() {
        let git = ScriptedGit::new();
        let prs = StubPullRequests::author(Some("octocat"));
        let mut req = request("1.2.3", Some("1.2.2"));
        req.explicit_notes = Some("MyPkg v1.2.3 (#42)\nhand written".to_string());

        let composed = ChangelogComposer::new(&git, &prs)
            .compose(&req)
            .await
            .unwrap();

        assert_eq!(composed.notes, "MyPkg v1.2.3 (#42)\nhand written");
        assert_eq!(composed.pr_number, None);
        assert!(git.commands().is_empty());
        assert!(prs.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_commit_message_failure_is_fatal() {
        let git = ScriptedGit::new().on_fail(
            &format!("log -1 --pretty=%B {SHA}"),
            "fatal: bad object",
        );
        let prs = StubPullRequests::author(None);

        let err = ChangelogComposer::new(&git, &prs)
            .compose(&request("1.2.3", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ChangelogError::CommitMessage { .. }));
        assert!(err.to_string().contains("fatal: bad object"));
    }

    #[test]
    fn test_fallback_actor_order() {
        let mut actors = ActorFallbacks {
            context_actor: Some(String::new()),
            env_actor: Some("env-actor".to_string()),
        };
        assert_eq!(fallback_actor(&actors), "env-actor");

        actors.env_actor = None;
        assert_eq!(fallback_actor(&actors), DEFAULT_ACTOR);
    }
}
