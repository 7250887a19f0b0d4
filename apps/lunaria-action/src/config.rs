//! Settings discovery and effective settings resolution.
//!
//! The action reads an optional `lunaria-action.toml|yaml|yml` from the
//! working directory (or closest ancestor) and merges it with CLI flags and
//! their environment fallbacks to produce an `Effective` config.
//! Defaults:
//! - `apiUrl`: `https://api.github.com`
//! - `engine`: auto-located `@lunariajs/core` CLI
//! - `output`: `human`
//! - `perPage`: 100 (clamped to 1..=100)
//! - `dryRun`: false
//!
//! Overrides precedence: CLI/env > settings file > defaults.

use crate::cli::RunArgs;
use crate::github::MAX_PER_PAGE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const SETTINGS_FILES: &[&str] = &[
    "lunaria-action.toml",
    "lunaria-action.yaml",
    "lunaria-action.yml",
];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root settings loaded from `lunaria-action.toml|yaml`.
pub struct ActionSettings {
    #[serde(rename = "apiUrl")]
    pub api_url: Option<String>,
    /// Engine executable, relative to the settings file's directory.
    pub engine: Option<String>,
    pub output: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
    #[serde(rename = "dryRun")]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by the run after applying precedence.
pub struct Effective {
    pub working_dir: PathBuf,
    pub token: Option<String>,
    pub event_path: Option<PathBuf>,
    pub repository: Option<String>,
    pub api_url: String,
    pub engine: Option<PathBuf>,
    pub output: String,
    pub per_page: u32,
    pub dry_run: bool,
    /// Settings file found for this run, if any.
    pub settings_file: Option<PathBuf>,
    /// Whether that file parsed.
    pub settings_loaded: bool,
}

/// Walk upward from `start` to the directory holding the settings file.
///
/// Stops when a settings file or a `.git` directory is found.
pub fn detect_settings_root(start: &Path) -> PathBuf {
    for cur in start.ancestors() {
        if SETTINGS_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
    }
    start.to_path_buf()
}

/// First settings file present in `root`, toml preferred.
pub fn settings_path(root: &Path) -> Option<PathBuf> {
    SETTINGS_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.exists())
}

/// Load `ActionSettings` from `lunaria-action.toml` or `.yaml|.yml` if present.
pub fn load_settings(root: &Path) -> Option<ActionSettings> {
    let path = settings_path(root)?;
    let s = fs::read_to_string(&path).ok()?;
    if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&s).ok()
    } else {
        serde_yaml::from_str(&s).ok()
    }
}

/// Resolve `Effective` by merging CLI flags, the settings file, and defaults.
pub fn resolve_effective(args: &RunArgs) -> Effective {
    let working_dir = PathBuf::from(args.working_dir.as_deref().unwrap_or("."));
    let root = detect_settings_root(&working_dir);
    let settings_file = settings_path(&root);
    let loaded = load_settings(&root);
    let settings_loaded = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let token = args
        .token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()));

    let api_url = args
        .api_url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .or(cfg.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let engine = args
        .engine
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| cfg.engine.as_ref().map(|e| root.join(e)));

    let output = args
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let per_page = cfg.per_page.unwrap_or(MAX_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let dry_run = args.dry_run || cfg.dry_run.unwrap_or(false);

    Effective {
        working_dir,
        token,
        event_path: args.event_path.as_ref().map(PathBuf::from),
        repository: args.repository.clone(),
        api_url,
        engine,
        output,
        per_page,
        dry_run,
        settings_file,
        settings_loaded,
    }
}
