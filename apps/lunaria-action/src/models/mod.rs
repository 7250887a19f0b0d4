//! Shared data models: webhook payload, GitHub REST resources, and the
//! engine's config/status modules.

pub mod lunaria;
pub mod status;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
/// Subset of a `pull_request` webhook payload.
pub struct EventPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
/// `GET /repos/{owner}/{repo}/pulls/{number}`
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
/// Change kind reported for a pull request file.
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, Deserialize)]
/// `GET /repos/{owner}/{repo}/pulls/{number}/files` item.
pub struct PullRequestFile {
    pub filename: String,
    pub status: FileStatus,
    pub blob_url: String,
}

#[derive(Debug, Clone, Deserialize)]
/// Issue comment as returned by the comments endpoints.
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Target pull request (also addressed as an issue for comments).
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    pub fn slug(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}
