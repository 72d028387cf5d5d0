//! Unity editor packaging for upm-release
//!
//! Runs the editor in batch mode with `-upmPack` to produce a signed UPM
//! archive and checks that exactly one archive was produced.

pub mod editor;
mod packager;

pub use editor::{locate_editor, EDITOR_ENV};
pub use packager::{find_archive, UnityPackager};
