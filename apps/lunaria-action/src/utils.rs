//! Console helpers: colored prefixes and GitHub Actions workflow commands.
//!
//! Inside a workflow run (`GITHUB_ACTIONS=true`) messages are printed as
//! `::notice::`, `::debug::` and `::error::` commands on stdout so the runner
//! annotates the job. Elsewhere they go to stderr with colored prefixes.

use owo_colors::OwoColorize;

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

fn debug_enabled() -> bool {
    std::env::var("RUNNER_DEBUG").map(|v| v == "1").unwrap_or(false)
        || std::env::var_os("LUNARIA_ACTION_DEBUG").is_some()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn debug_prefix() -> String {
    if use_colors() {
        "debug:".bright_black().to_string()
    } else {
        "debug:".to_string()
    }
}

/// Escape a message for use as workflow command data.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Format `::<name>::<message>`.
pub fn workflow_command(name: &str, message: &str) -> String {
    format!("::{}::{}", name, escape_data(message))
}

pub fn notice(message: &str) {
    if in_actions() {
        println!("{}", workflow_command("notice", message));
    } else {
        eprintln!("{} {}", note_prefix(), message);
    }
}

/// Debug lines are always sent to the runner, which hides them unless step
/// debugging is on; locally they need `LUNARIA_ACTION_DEBUG`.
pub fn debug(message: &str) {
    if in_actions() {
        println!("{}", workflow_command("debug", message));
    } else if debug_enabled() {
        eprintln!("{} {}", debug_prefix(), message);
    }
}

/// Report a fatal failure. The caller sets the exit code.
pub fn set_failed(message: &str) {
    if in_actions() {
        println!("{}", workflow_command("error", message));
    } else {
        eprintln!("{} {}", error_prefix(), message);
    }
}
