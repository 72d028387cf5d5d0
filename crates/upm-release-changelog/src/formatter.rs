//! Markdown formatting for release notes

use std::sync::OnceLock;

use regex::Regex;

use upm_release_core::types::{PackageIdentity, RepoSlug};

/// Header opening every composed release
pub const NOTES_HEADER: &str = "## What's Changed";

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+]\s").expect("valid bullet regex"))
}

/// Header plus the credit line for the released package
pub fn credit_line(package: &PackageIdentity, actor: &str, pr_number: Option<u64>) -> String {
    let pr = pr_number.map(|n| format!(" in #{n}")).unwrap_or_default();
    format!(
        "{NOTES_HEADER}\n- {} {} by @{actor}{pr}",
        package.name, package.version
    )
}

/// Indent a notes body beneath the credit line.
///
/// Bulleted lines keep their marker, other lines become bullets, and blank
/// lines stay empty.
pub fn indent_body(body: &str) -> String {
    body.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                String::new()
            } else if bullet_regex().is_match(line.trim_start()) {
                format!("  {line}")
            } else {
                format!("  - {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// URL of the changes in this release
pub fn changelog_url(
    server_url: &str,
    repository: &RepoSlug,
    last_tag: Option<&str>,
    version: &str,
) -> String {
    let base = format!(
        "{}/{}/{}",
        server_url.trim_end_matches('/'),
        repository.owner,
        repository.repo
    );
    match last_tag.filter(|tag| !tag.is_empty()) {
        Some(tag) => format!("{base}/compare/{tag}...{version}"),
        None => format!("{base}/commits/{version}"),
    }
}

/// Full-changelog line closing the notes
pub fn changelog_line(
    server_url: &str,
    repository: &RepoSlug,
    last_tag: Option<&str>,
    version: &str,
) -> String {
    format!(
        "**Full Changelog**: {}",
        changelog_url(server_url, repository, last_tag, version)
    )
}

/// Assemble the complete notes
pub fn format_notes(
    package: &PackageIdentity,
    actor: &str,
    pr_number: Option<u64>,
    body: &str,
    changelog: &str,
) -> String {
    let mut notes = credit_line(package, actor, pr_number);
    if !body.is_empty() {
        notes.push_str("\n\n");
        notes.push_str(&indent_body(body));
    }
    notes.push_str("\n\n");
    notes.push_str(changelog);
    notes
}
