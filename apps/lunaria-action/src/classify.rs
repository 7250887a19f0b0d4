//! Per-file status classification.
//!
//! A file's change kind is normalized first (`renamed`/`copied` count as
//! added, `modified` as changed) and then prefixed by its locale class,
//! giving one of eight outcomes with a fixed note. Localization files whose
//! source changed after the pull request was opened also get the
//! `outdated` warning.

use crate::error::Result;
use crate::matcher::{collapse_filename, find_file_config, unroot_filename};
use crate::models::lunaria::LunariaConfig;
use crate::models::status::{find_entry, StatusEntry};
use crate::models::{FileStatus, PullRequest, PullRequestFile};
use crate::pattern::PathResolver;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl From<FileStatus> for ChangeKind {
    fn from(status: FileStatus) -> Self {
        match status {
            FileStatus::Renamed | FileStatus::Copied | FileStatus::Added => ChangeKind::Added,
            FileStatus::Modified | FileStatus::Changed => ChangeKind::Changed,
            FileStatus::Removed => ChangeKind::Removed,
            FileStatus::Unchanged => ChangeKind::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    SourceAdded,
    SourceRemoved,
    SourceChanged,
    SourceUnchanged,
    LocalizationAdded,
    LocalizationRemoved,
    LocalizationChanged,
    LocalizationUnchanged,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::SourceAdded => "source-added",
            Outcome::SourceRemoved => "source-removed",
            Outcome::SourceChanged => "source-changed",
            Outcome::SourceUnchanged => "source-unchanged",
            Outcome::LocalizationAdded => "localization-added",
            Outcome::LocalizationRemoved => "localization-removed",
            Outcome::LocalizationChanged => "localization-changed",
            Outcome::LocalizationUnchanged => "localization-unchanged",
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            Outcome::SourceAdded => "Source added, will be tracked.",
            Outcome::SourceRemoved => "Source removed, will stop being tracked.",
            Outcome::SourceChanged => "Source changed, localizations will be marked as outdated.",
            Outcome::SourceUnchanged => "Source unchanged, will be ignored.",
            Outcome::LocalizationAdded => "Localization added, will be marked as complete.",
            Outcome::LocalizationRemoved => "Localization removed, will be marked as missing.",
            Outcome::LocalizationChanged => "Localization changed, will be marked as complete.",
            Outcome::LocalizationUnchanged => "Localization unchanged, will be ignored.",
        }
    }
}

/// Map a change kind and locale class to its outcome.
pub fn classify(status: FileStatus, is_source_locale: bool) -> Outcome {
    match (ChangeKind::from(status), is_source_locale) {
        (ChangeKind::Added, true) => Outcome::SourceAdded,
        (ChangeKind::Removed, true) => Outcome::SourceRemoved,
        (ChangeKind::Changed, true) => Outcome::SourceChanged,
        (ChangeKind::Unchanged, true) => Outcome::SourceUnchanged,
        (ChangeKind::Added, false) => Outcome::LocalizationAdded,
        (ChangeKind::Removed, false) => Outcome::LocalizationRemoved,
        (ChangeKind::Changed, false) => Outcome::LocalizationChanged,
        (ChangeKind::Unchanged, false) => Outcome::LocalizationUnchanged,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Warning {
    Outdated,
}

impl Warning {
    pub const ALL: &'static [Warning] = &[Warning::Outdated];

    pub fn icon(self) -> &'static str {
        match self {
            Warning::Outdated => "🔄️",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Warning::Outdated => "The source for this localization has been updated since the creation of this pull request, make sure all changes in the source have been applied.",
        }
    }
}

/// Whether a file's source counterpart changed after the PR was created.
///
/// Source files and files without a status entry are never outdated.
pub fn is_outdated(
    is_source_locale: bool,
    entry: Option<&StatusEntry>,
    created_at: DateTime<Utc>,
) -> bool {
    let latest_source_change = match entry {
        Some(e) if !is_source_locale => e.last_major_change(),
        _ => created_at,
    };
    latest_source_change > created_at
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// One row of the tracked files table.
pub struct FileRow {
    pub lang: String,
    pub display_path: String,
    pub blob_url: String,
    pub outcome: Outcome,
    pub warnings: Vec<Warning>,
}

impl FileRow {
    /// Note cell: the outcome note followed by warning icons.
    pub fn note_cell(&self) -> String {
        let icons = self
            .warnings
            .iter()
            .map(|w| w.icon())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", self.outcome.note(), icons)
    }
}

/// Classify a tracked file; `None` when no rule matches it.
pub fn classify_file(
    file: &PullRequestFile,
    config: &LunariaConfig,
    status: &[StatusEntry],
    pull_request: &PullRequest,
) -> Result<Option<FileRow>> {
    let rootless = unroot_filename(&config.repository.root_dir, &file.filename);
    let Some(file_config) = find_file_config(rootless, &config.files) else {
        return Ok(None);
    };
    let default_lang = config.default_locale.lang.as_str();
    let resolver = PathResolver::new(&file_config.pattern, &config.langs())
        .map_err(crate::error::ActionError::InvalidConfig)?;
    // A tracked file outside its pattern is reported under its own path.
    let params = resolver.is_match(rootless).unwrap_or_default();
    let shared_path = resolver
        .to_shared_path(rootless)
        .unwrap_or_else(|| rootless.to_string());

    // Paths without a lang segment belong to the root (default) locale.
    let lang = params.lang.unwrap_or_else(|| default_lang.to_string());
    let is_source_locale = lang == default_lang;

    let entry = find_entry(status, &shared_path);
    let mut warnings = Vec::new();
    if is_outdated(is_source_locale, entry, pull_request.created_at) {
        warnings.push(Warning::Outdated);
    }

    let display_path =
        collapse_filename(&shared_path, config.dashboard.bases_to_hide.as_deref()).to_string();
    Ok(Some(FileRow {
        lang,
        display_path,
        blob_url: file.blob_url.clone(),
        outcome: classify(file.status, is_source_locale),
        warnings,
    }))
}
