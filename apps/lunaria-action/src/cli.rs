//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lunaria-action",
    version,
    about = "Lunaria pull request status comments",
    long_about = "Lunaria action — summarizes how a pull request changes the localization status of tracked files and keeps that summary in a single PR comment.\n\nConfiguration precedence: CLI/env > lunaria-action.toml > defaults.",
    after_help = "Examples:\n  lunaria-action run\n  lunaria-action run --dry-run --event-path event.json --repository withastro/docs\n  lunaria-action run --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current lunaria-action version.")]
    Version,
    /// Handle a pull request event
    #[command(
        about = "Handle a pull request event",
        long_about = "Read the pull_request event payload, compute the status of tracked files and create or update the summary comment. Events other than opened/synchronize are skipped.",
        after_help = "Examples:\n  lunaria-action run --token $GITHUB_TOKEN\n  lunaria-action run --engine ./node_modules/@lunariajs/core/dist/cli/index.mjs --dry-run"
    )]
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true, help = "GitHub token (falls back to GITHUB_TOKEN)")]
    pub token: Option<String>,
    #[arg(long, env = "GITHUB_EVENT_PATH", help = "Path to the webhook event payload JSON")]
    pub event_path: Option<String>,
    #[arg(long, env = "GITHUB_REPOSITORY", help = "Target repository as owner/name")]
    pub repository: Option<String>,
    #[arg(long, env = "GITHUB_API_URL", help = "GitHub REST base URL (default: https://api.github.com)")]
    pub api_url: Option<String>,
    #[arg(long, help = "Status engine executable (default: node_modules/@lunariajs/core CLI)")]
    pub engine: Option<String>,
    #[arg(long, help = "Directory the engine runs in (default: current dir)")]
    pub working_dir: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Print the comment instead of publishing it")]
    pub dry_run: bool,
}
