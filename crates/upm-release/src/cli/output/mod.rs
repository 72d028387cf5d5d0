//! Output formatting utilities
//!
//! Inside GitHub Actions warnings and errors are also emitted as workflow
//! commands so they show up as annotations on the run.

use std::sync::atomic::{AtomicBool, Ordering};

use console::{style, Style};

static GITHUB_ACTIONS: AtomicBool = AtomicBool::new(false);

/// Enable GitHub Actions workflow commands
pub fn set_github_actions(enabled: bool) {
    GITHUB_ACTIONS.store(enabled, Ordering::Relaxed);
}

fn github_actions() -> bool {
    GITHUB_ACTIONS.load(Ordering::Relaxed)
}

/// Escape a workflow command message
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    if github_actions() {
        println!("::error::{}", escape_data(message));
    }
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    if github_actions() {
        println!("::warning::{}", escape_data(message));
    } else {
        println!("{} {}", style("!").yellow().bold(), message);
    }
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Print a titled block, collapsible in GitHub Actions logs
pub fn group(title: &str, body: &str) {
    if github_actions() {
        println!("::group::{title}");
        println!("{body}");
        println!("::endgroup::");
    } else {
        println!("{}", header(title));
        println!("{body}");
        println!();
    }
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for tags
pub fn tag_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}
