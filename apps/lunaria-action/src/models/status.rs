//! Localization status entries printed by the engine.
//!
//! Only the fields needed for the outdated check are modeled; the rest of
//! each entry is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Status of one tracked file, keyed by its locale-independent path.
pub struct StatusEntry {
    pub shared_path: String,
    pub source_file: SourceFile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceFile {
    pub git: GitInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub last_major_change: DateTime<Utc>,
}

impl StatusEntry {
    pub fn last_major_change(&self) -> DateTime<Utc> {
        self.source_file.git.last_major_change
    }
}

/// Find the entry whose shared path equals `shared_path`.
pub fn find_entry<'a>(status: &'a [StatusEntry], shared_path: &str) -> Option<&'a StatusEntry> {
    status.iter().find(|e| e.shared_path == shared_path)
}
