//! End-to-end handling of one pull request event.
//!
//! Gating happens first and ends the run quietly (with a notice) when the
//! payload has no pull request, no repository, or an action other than
//! `opened`/`synchronize`. A ready run loads the engine output, fetches the
//! pull request and its files, classifies tracked files, and publishes the
//! rendered comment as its very last step.

use crate::classify::{classify_file, FileRow};
use crate::comment::{overview_untracked, render, OVERVIEW_TRACKED};
use crate::config::Effective;
use crate::engine::{self, EngineContext};
use crate::error::{ActionError, Result};
use crate::github::{list_all_files, GithubApi, GithubClient};
use crate::matcher::{find_file_config, unroot_filename};
use crate::models::{EventPayload, IssueRef};
use crate::publish::{comment_summary, PublishAction};
use crate::utils;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::Path;

const HANDLED_ACTIONS: &[&str] = &["opened", "synchronize"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoPullRequest,
    NoRepository,
    WrongAction(Option<String>),
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NoPullRequest => "Skipped, could not find the pull request context.",
            SkipReason::NoRepository => "Skipped, could not find pull request repository.",
            SkipReason::WrongAction(_) => {
                "Skipped, Lunaria action only runs during pull request opening/synchronization."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Skip(SkipReason),
    Ready(IssueRef),
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Skipped(SkipReason),
    NoTrackedFiles,
    Published {
        action: PublishAction,
        comment_id: u64,
        rows: Vec<FileRow>,
        ignored_keyword: Option<String>,
    },
    DryRun {
        body: String,
        rows: Vec<FileRow>,
        ignored_keyword: Option<String>,
    },
}

/// Read the webhook payload; a missing file yields an empty payload.
pub fn read_event(path: Option<&Path>) -> Result<EventPayload> {
    match path {
        Some(p) if p.is_file() => {
            let raw = fs::read_to_string(p)?;
            serde_json::from_str(&raw)
                .map_err(|e| ActionError::event(format!("{}: {}", p.display(), e)))
        }
        _ => Ok(EventPayload::default()),
    }
}

fn parse_repository(slug: &str) -> Result<(String, String)> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ActionError::event(format!(
            "repository `{}` is not in owner/name form",
            slug
        ))),
    }
}

/// Decide whether the event should be handled.
///
/// `repository` (`GITHUB_REPOSITORY`) wins over the payload's repository
/// for the API target, but the payload must still carry one.
pub fn gate(payload: &EventPayload, repository: Option<&str>) -> Result<Gate> {
    let Some(pr) = payload.pull_request.as_ref() else {
        return Ok(Gate::Skip(SkipReason::NoPullRequest));
    };
    let Some(repo) = payload.repository.as_ref() else {
        return Ok(Gate::Skip(SkipReason::NoRepository));
    };
    let action = payload.action.as_deref();
    if !action.is_some_and(|a| HANDLED_ACTIONS.contains(&a)) {
        return Ok(Gate::Skip(SkipReason::WrongAction(
            action.map(str::to_string),
        )));
    }
    let (owner, name) = match repository.filter(|r| !r.is_empty()) {
        Some(slug) => parse_repository(slug)?,
        None => (repo.owner.login.clone(), repo.name.clone()),
    };
    Ok(Gate::Ready(IssueRef {
        owner,
        repo: name,
        number: pr.number,
    }))
}

fn keyword_regex(alternation: &str) -> core::result::Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("({})", alternation))
        .case_insensitive(true)
        .build()
}

/// First ignore keyword found in `title`, matched case-insensitively.
///
/// Keywords are joined into a single regex alternation, so they may use
/// regex syntax. When the alternation does not compile (e.g. a literal
/// `{skip}`), every keyword is matched as plain text instead.
pub fn ignored_keyword(title: &str, keywords: &[String]) -> Result<Option<String>> {
    let keywords: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Ok(None);
    }
    let re = match keyword_regex(&keywords.join("|")) {
        Ok(re) => re,
        Err(e) => {
            utils::debug(&format!(
                "ignore keywords are not a valid regex ({}); matching them literally",
                e
            ));
            let escaped: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
            keyword_regex(&escaped.join("|"))?
        }
    };
    Ok(re
        .find(title)
        .map(|m| m.as_str().to_string())
        .filter(|m| !m.is_empty()))
}

/// Overview section for the pull request title.
pub fn status_overview(ignored: Option<&str>) -> String {
    match ignored {
        Some(keyword) => overview_untracked(keyword),
        None => OVERVIEW_TRACKED.to_string(),
    }
}

/// Run a ready event against `api` with already loaded engine output.
pub fn process<A: GithubApi + ?Sized>(
    api: &A,
    issue: &IssueRef,
    ctx: &EngineContext,
    per_page: u32,
    dry_run: bool,
) -> Result<RunOutcome> {
    let config = &ctx.config;
    let pull_request = api.get_pull_request(issue)?;
    let files = list_all_files(api, issue, per_page)?;

    let tracked: Vec<_> = files
        .iter()
        .filter(|f| {
            find_file_config(unroot_filename(&config.repository.root_dir, &f.filename), &config.files)
                .is_some()
        })
        .collect();
    if tracked.is_empty() {
        utils::notice("This pull request doesn't include any tracked files");
        return Ok(RunOutcome::NoTrackedFiles);
    }
    utils::debug(&format!(
        "{} of {} changed files are tracked in {}",
        tracked.len(),
        files.len(),
        issue.slug()
    ));

    let ignored = ignored_keyword(&pull_request.title, &config.ignore_keywords)?;
    let overview = status_overview(ignored.as_deref());

    let mut rows = Vec::with_capacity(tracked.len());
    for file in tracked {
        if let Some(row) = classify_file(file, config, &ctx.status, &pull_request)? {
            rows.push(row);
        }
    }
    let body = render(&overview, &rows);

    if dry_run {
        return Ok(RunOutcome::DryRun {
            body,
            rows,
            ignored_keyword: ignored,
        });
    }
    let published = comment_summary(api, issue, &body, per_page)?;
    Ok(RunOutcome::Published {
        action: published.action,
        comment_id: published.comment.id,
        rows,
        ignored_keyword: ignored,
    })
}

/// Full run from effective settings: gate, engine, GitHub, publish.
pub fn run(eff: &Effective) -> Result<RunOutcome> {
    let payload = read_event(eff.event_path.as_deref())?;
    let issue = match gate(&payload, eff.repository.as_deref())? {
        Gate::Ready(issue) => issue,
        Gate::Skip(reason) => {
            utils::notice(reason.message());
            return Ok(RunOutcome::Skipped(reason));
        }
    };
    let token = eff
        .token
        .as_deref()
        .ok_or(ActionError::MissingInput("token"))?;
    let ctx = engine::load_context(eff.engine.as_deref(), &eff.working_dir)?;
    let client = GithubClient::new(&eff.api_url, token);
    process(&client, &issue, &ctx, eff.per_page, eff.dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Outcome;
    use crate::comment::MARKER;
    use crate::github::fake::FakeGithub;
    use crate::models::{FileStatus, PullRequestFile};
    use serde_json::json;

    fn payload(v: serde_json::Value) -> EventPayload {
        serde_json::from_value(v).unwrap()
    }

    fn ready_payload(action: &str) -> EventPayload {
        payload(json!({
            "action": action,
            "pull_request": { "number": 42 },
            "repository": { "name": "docs", "owner": { "login": "withastro" } }
        }))
    }

    fn issue() -> IssueRef {
        IssueRef {
            owner: "withastro".into(),
            repo: "docs".into(),
            number: 42,
        }
    }

    fn ctx() -> EngineContext {
        engine::parse_engine_output(
            &json!([
                {
                    "repository": { "name": "withastro/docs", "rootDir": "." },
                    "defaultLocale": { "label": "English", "lang": "en" },
                    "locales": [{ "label": "Français", "lang": "fr" }],
                    "files": [{ "location": "docs/**/*.md", "pattern": "docs/@lang/@path" }],
                    "ignoreKeywords": ["skip-i18n", "fix typo"],
                    "dashboard": { "basesToHide": ["docs/"] }
                },
                [
                    { "sharedPath": "docs/guide.md", "sourceFile": { "git": { "lastMajorChange": "2024-03-10T00:00:00Z" } } }
                ]
            ])
            .to_string(),
        )
        .unwrap()
    }

    fn file(name: &str, status: FileStatus) -> PullRequestFile {
        PullRequestFile {
            filename: name.into(),
            status,
            blob_url: format!("https://github.com/withastro/docs/blob/sha/{}", name),
        }
    }

    #[test]
    fn test_gate_states() {
        assert_eq!(
            gate(&payload(json!({ "action": "opened" })), None).unwrap(),
            Gate::Skip(SkipReason::NoPullRequest)
        );
        assert_eq!(
            gate(
                &payload(json!({ "action": "opened", "pull_request": { "number": 1 } })),
                None
            )
            .unwrap(),
            Gate::Skip(SkipReason::NoRepository)
        );
        assert_eq!(
            gate(&ready_payload("closed"), None).unwrap(),
            Gate::Skip(SkipReason::WrongAction(Some("closed".into())))
        );
        assert_eq!(gate(&ready_payload("opened"), None).unwrap(), Gate::Ready(issue()));
        assert_eq!(
            gate(&ready_payload("synchronize"), None).unwrap(),
            Gate::Ready(issue())
        );
    }

    #[test]
    fn test_gate_prefers_repository_override() {
        let g = gate(&ready_payload("opened"), Some("fork-owner/docs-fork")).unwrap();
        let Gate::Ready(iss) = g else {
            panic!("expected ready");
        };
        assert_eq!(iss.owner, "fork-owner");
        assert_eq!(iss.repo, "docs-fork");
        assert!(gate(&ready_payload("opened"), Some("not-a-slug")).is_err());
    }

    #[test]
    fn test_missing_event_file_is_empty_payload() {
        let p = read_event(Some(Path::new("/nonexistent/event.json"))).unwrap();
        assert!(p.pull_request.is_none());
    }

    #[test]
    fn test_ignored_keyword_is_case_insensitive() {
        let kws = vec!["skip-i18n".to_string(), "fix typo".to_string()];
        assert_eq!(
            ignored_keyword("Update docs [SKIP-i18n]", &kws).unwrap().as_deref(),
            Some("SKIP-i18n")
        );
        assert_eq!(ignored_keyword("Update docs", &kws).unwrap(), None);
        assert_eq!(ignored_keyword("Update docs", &[]).unwrap(), None);
    }

    #[test]
    fn test_ignored_keyword_falls_back_to_literal_match() {
        let kws = vec!["{skip}".to_string(), "wip".to_string()];
        assert_eq!(
            ignored_keyword("Update {skip}", &kws).unwrap().as_deref(),
            Some("{skip}")
        );
        assert_eq!(
            ignored_keyword("Update docs (WIP)", &kws).unwrap().as_deref(),
            Some("WIP")
        );
        assert_eq!(ignored_keyword("Update skip", &kws).unwrap(), None);
    }

    #[test]
    fn test_run_without_token_fails_before_engine() {
        let tmp = tempfile::tempdir().unwrap();
        let event = tmp.path().join("event.json");
        std::fs::write(
            &event,
            json!({
                "action": "opened",
                "pull_request": { "number": 42 },
                "repository": { "name": "docs", "owner": { "login": "withastro" } }
            })
            .to_string(),
        )
        .unwrap();
        let eff = Effective {
            working_dir: tmp.path().to_path_buf(),
            token: None,
            event_path: Some(event),
            repository: None,
            api_url: crate::config::DEFAULT_API_URL.to_string(),
            // Would fail with EngineNotFound if it were reached.
            engine: None,
            output: "human".to_string(),
            per_page: 100,
            dry_run: false,
            settings_file: None,
            settings_loaded: false,
        };
        let err = run(&eff).unwrap_err();
        assert!(matches!(err, ActionError::MissingInput("token")));
    }

    #[test]
    fn test_ignore_keyword_switches_overview_only() {
        let mut gh = FakeGithub::new("Update docs [skip-i18n]", "2024-03-01T00:00:00Z");
        gh.files = vec![
            file("docs/en/guide.md", FileStatus::Modified),
            file("docs/fr/guide.md", FileStatus::Modified),
        ];
        let out = process(&gh, &issue(), &ctx(), 100, false).unwrap();
        let RunOutcome::Published {
            action,
            rows,
            ignored_keyword,
            ..
        } = out
        else {
            panic!("expected publish");
        };
        assert_eq!(action, PublishAction::Created);
        assert_eq!(ignored_keyword.as_deref(), Some("skip-i18n"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].outcome, Outcome::SourceChanged);
        assert_eq!(rows[1].outcome, Outcome::LocalizationChanged);
        let comments = gh.comments.borrow();
        let body = comments[0].body.as_deref().unwrap();
        assert!(body.contains(MARKER));
        assert!(body.contains("will _not_ trigger status changes"));
        assert!(body.contains("Found: `skip-i18n`."));
        assert!(body.contains("🔄️"));
    }

    #[test]
    fn test_no_tracked_files_publishes_nothing() {
        let mut gh = FakeGithub::new("Refactor", "2024-03-01T00:00:00Z");
        gh.files = vec![
            file("src/main.ts", FileStatus::Modified),
            file("node_modules/x/docs/a.md", FileStatus::Added),
        ];
        let out = process(&gh, &issue(), &ctx(), 100, false).unwrap();
        assert!(matches!(out, RunOutcome::NoTrackedFiles));
        assert_eq!(*gh.created.borrow(), 0);
        assert!(gh.updated.borrow().is_empty());
        assert!(gh.comment_pages_requested.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_renders_without_publishing() {
        let mut gh = FakeGithub::new("Add guide", "2024-03-20T00:00:00Z");
        gh.files = vec![file("docs/fr/guide.md", FileStatus::Added)];
        let out = process(&gh, &issue(), &ctx(), 100, true).unwrap();
        let RunOutcome::DryRun { body, rows, .. } = out else {
            panic!("expected dry run");
        };
        assert!(body.contains("🌕"));
        assert_eq!(rows[0].outcome, Outcome::LocalizationAdded);
        // Source changed before the PR was opened: not outdated.
        assert!(rows[0].warnings.is_empty());
        assert_eq!(*gh.created.borrow(), 0);
    }

    #[test]
    fn test_rerun_updates_existing_comment() {
        let mut gh = FakeGithub::new("Add guide", "2024-03-01T00:00:00Z");
        gh.files = vec![file("docs/fr/guide.md", FileStatus::Added)];
        let first = process(&gh, &issue(), &ctx(), 100, false).unwrap();
        let second = process(&gh, &issue(), &ctx(), 100, false).unwrap();
        assert!(matches!(
            first,
            RunOutcome::Published { action: PublishAction::Created, .. }
        ));
        assert!(matches!(
            second,
            RunOutcome::Published { action: PublishAction::Updated, .. }
        ));
        assert_eq!(gh.comments.borrow().len(), 1);
    }
}
