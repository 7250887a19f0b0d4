//! Find-or-create publishing of the summary comment.
//!
//! At most one comment carrying [`MARKER`] is kept per pull request: an
//! existing one is overwritten, otherwise a new one is created.

use crate::comment::MARKER;
use crate::error::Result;
use crate::github::{comment_pages, GithubApi};
use crate::models::{IssueComment, IssueRef};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAction {
    Created,
    Updated,
}

#[derive(Debug, Clone)]
pub struct Published {
    pub action: PublishAction,
    pub comment: IssueComment,
}

/// Id of the oldest comment containing the marker.
///
/// Pages are requested one at a time and the scan stops at the first page
/// holding a match.
pub fn find_existing_comment_id<A: GithubApi + ?Sized>(
    api: &A,
    issue: &IssueRef,
    per_page: u32,
) -> Result<Option<u64>> {
    for page in comment_pages(api, issue, per_page) {
        let found = page?
            .into_iter()
            .find(|c| c.body.as_deref().is_some_and(|b| b.contains(MARKER)));
        if let Some(c) = found {
            return Ok(Some(c.id));
        }
    }
    Ok(None)
}

/// Update the existing summary comment or create one.
pub fn comment_summary<A: GithubApi + ?Sized>(
    api: &A,
    issue: &IssueRef,
    body: &str,
    per_page: u32,
) -> Result<Published> {
    match find_existing_comment_id(api, issue, per_page)? {
        Some(id) => Ok(Published {
            action: PublishAction::Updated,
            comment: api.update_comment(issue, id, body)?,
        }),
        None => Ok(Published {
            action: PublishAction::Created,
            comment: api.create_comment(issue, body)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::FakeGithub;

    fn issue() -> IssueRef {
        IssueRef {
            owner: "o".into(),
            repo: "r".into(),
            number: 42,
        }
    }

    fn plain(id: u64) -> IssueComment {
        IssueComment {
            id,
            body: Some(format!("LGTM #{}", id)),
        }
    }

    fn body() -> String {
        format!("\n{}\n\n## Lunaria Status Overview\n", MARKER)
    }

    #[test]
    fn test_creates_when_no_marker() {
        let gh = FakeGithub::new("t", "2024-01-01T00:00:00Z")
            .with_comments((1..=5).map(plain).collect());
        let out = comment_summary(&gh, &issue(), &body(), 100).unwrap();
        assert_eq!(out.action, PublishAction::Created);
        assert_eq!(*gh.created.borrow(), 1);
        assert!(gh.updated.borrow().is_empty());
    }

    #[test]
    fn test_publishing_twice_keeps_one_comment() {
        let gh = FakeGithub::new("t", "2024-01-01T00:00:00Z").with_comments(vec![plain(1)]);
        let first = comment_summary(&gh, &issue(), &body(), 100).unwrap();
        let second = comment_summary(&gh, &issue(), &body(), 100).unwrap();
        assert_eq!(first.action, PublishAction::Created);
        assert_eq!(second.action, PublishAction::Updated);
        assert_eq!(second.comment.id, first.comment.id);
        let with_marker = gh
            .comments
            .borrow()
            .iter()
            .filter(|c| c.body.as_deref().unwrap_or("").contains(MARKER))
            .count();
        assert_eq!(with_marker, 1);
    }

    #[test]
    fn test_stops_at_first_page_with_marker() {
        let mut comments: Vec<IssueComment> = (1..=300).map(plain).collect();
        comments[149].body = Some(format!("{}\nold summary", MARKER));
        let gh = FakeGithub::new("t", "2024-01-01T00:00:00Z").with_comments(comments);
        let out = comment_summary(&gh, &issue(), &body(), 100).unwrap();
        assert_eq!(out.action, PublishAction::Updated);
        assert_eq!(out.comment.id, 150);
        assert_eq!(*gh.comment_pages_requested.borrow(), vec![1, 2]);
        assert_eq!(*gh.updated.borrow(), vec![150]);
        assert_eq!(*gh.created.borrow(), 0);
    }

    #[test]
    fn test_oldest_marker_comment_wins() {
        let mut comments: Vec<IssueComment> = (1..=4).map(plain).collect();
        comments[1].body = Some(MARKER.to_string());
        comments[3].body = Some(MARKER.to_string());
        let gh = FakeGithub::new("t", "2024-01-01T00:00:00Z").with_comments(comments);
        assert_eq!(find_existing_comment_id(&gh, &issue(), 100).unwrap(), Some(2));
    }

    #[test]
    fn test_comment_without_body_is_skipped() {
        let gh = FakeGithub::new("t", "2024-01-01T00:00:00Z")
            .with_comments(vec![IssueComment { id: 9, body: None }]);
        assert_eq!(find_existing_comment_id(&gh, &issue(), 100).unwrap(), None);
    }
}
