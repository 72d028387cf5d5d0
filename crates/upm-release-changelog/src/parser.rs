//! Release line parsing
//!
//! A release commit carries a first line naming the package, its version and
//! the pull request that produced it, e.g. `com.example.tools v1.2.3 (#42)`.

use regex::Regex;

use upm_release_core::types::PackageIdentity;

use crate::types::ExtractedNotes;

/// Pattern matching the release line for a package.
///
/// Name and version are matched literally; the `v` prefix is optional and the
/// pull-request marker is either `#N` or `(#N)`.
pub fn release_line_pattern(package: &PackageIdentity) -> Regex {
    let pattern = format!(
        r"^{}\s+v?{}\s*(?:\(#(\d+)\)|#(\d+))$",
        regex::escape(&package.name),
        regex::escape(&package.version)
    );
    // Both interpolated parts are escaped, so the pattern is always valid
    Regex::new(&pattern).expect("escaped release line pattern is valid")
}

/// Split a commit message into a pull-request number and a notes body.
///
/// A matching first line is always removed from the body. When the first
/// line is not a release line the whole message is the body.
pub fn extract_release_line(message: &str, package: &PackageIdentity) -> ExtractedNotes {
    let message = message.trim();
    let (first, rest) = match message.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (message, ""),
    };

    let Some(caps) = release_line_pattern(package).captures(first.trim_end()) else {
        return ExtractedNotes {
            pr_number: None,
            body: message.to_string(),
        };
    };

    // A number too large for a pull request is kept out of the credit line
    let pr_number = caps
        .get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    ExtractedNotes {
        pr_number,
        body: rest.trim().to_string(),
    }
}
