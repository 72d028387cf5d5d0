//! upm-release Changelog - release notes composition
//!
//! Release notes are built from the target commit's message: a first line of
//! the form `<name> v<version> (#<pr>)` credits the pull request and its
//! author, the rest of the message becomes an indented notes body, and a
//! full-changelog link against the previous tag closes the notes.

mod composer;
pub mod formatter;
pub mod parser;
pub mod types;

pub use composer::ChangelogComposer;
pub use parser::{extract_release_line, release_line_pattern};
pub use types::{ActorFallbacks, ComposeRequest, ComposedNotes, ExtractedNotes};
