//! GitHub REST access.
//!
//! `GithubApi` is the seam used by the publisher and the orchestrator; the
//! production implementation is a blocking `ureq` client. Listings are
//! exposed page by page through [`Pages`], a lazy iterator, so callers can
//! stop before requesting pages they do not need.

use crate::error::Result;
use crate::models::{IssueComment, IssueRef, PullRequest, PullRequestFile};
use serde_json::json;
use std::time::Duration;

/// Largest page size accepted by the GitHub REST API.
pub const MAX_PER_PAGE: u32 = 100;

pub trait GithubApi {
    fn get_pull_request(&self, issue: &IssueRef) -> Result<PullRequest>;
    fn list_files_page(
        &self,
        issue: &IssueRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestFile>>;
    /// Issue comments, oldest first.
    fn list_comments_page(
        &self,
        issue: &IssueRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<IssueComment>>;
    fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<IssueComment>;
    fn update_comment(&self, issue: &IssueRef, comment_id: u64, body: &str)
        -> Result<IssueComment>;
}

/// Lazily fetched pages of a listing endpoint.
///
/// Yields pages starting at 1 and stops after the first short or empty page,
/// or after the first error.
pub struct Pages<T, F>
where
    F: FnMut(u32) -> Result<Vec<T>>,
{
    fetch: F,
    next_page: u32,
    per_page: u32,
    done: bool,
}

impl<T, F> Pages<T, F>
where
    F: FnMut(u32) -> Result<Vec<T>>,
{
    pub fn new(per_page: u32, fetch: F) -> Self {
        Self {
            fetch,
            next_page: 1,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            done: false,
        }
    }
}

impl<T, F> Iterator for Pages<T, F>
where
    F: FnMut(u32) -> Result<Vec<T>>,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match (self.fetch)(self.next_page) {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(items) => {
                self.next_page += 1;
                if items.len() < self.per_page as usize {
                    self.done = true;
                }
                if items.is_empty() {
                    None
                } else {
                    Some(Ok(items))
                }
            }
        }
    }
}

/// Comment pages for `issue`, requested on demand.
pub fn comment_pages<'a, A: GithubApi + ?Sized>(
    api: &'a A,
    issue: &'a IssueRef,
    per_page: u32,
) -> Pages<IssueComment, impl FnMut(u32) -> Result<Vec<IssueComment>> + 'a> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    Pages::new(per_page, move |page| api.list_comments_page(issue, page, per_page))
}

/// Every changed file of the pull request, across all pages.
pub fn list_all_files<A: GithubApi + ?Sized>(
    api: &A,
    issue: &IssueRef,
    per_page: u32,
) -> Result<Vec<PullRequestFile>> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let mut files = Vec::new();
    for page in Pages::new(per_page, |page| api.list_files_page(issue, page, per_page)) {
        files.extend(page?);
    }
    Ok(files)
}

/// Blocking REST client authenticated with a token.
pub struct GithubClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(30))
            .timeout_write(Duration::from_secs(30))
            .user_agent(concat!("lunaria-action/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn repo_url(&self, issue: &IssueRef, rest: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, issue.owner, issue.repo, rest
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }

    fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<T>> {
        let resp = self
            .request("GET", url)
            .query("per_page", &per_page.to_string())
            .query("page", &page.to_string())
            .call()?;
        Ok(resp.into_json()?)
    }
}

impl GithubApi for GithubClient {
    fn get_pull_request(&self, issue: &IssueRef) -> Result<PullRequest> {
        let url = self.repo_url(issue, &format!("pulls/{}", issue.number));
        Ok(self.request("GET", &url).call()?.into_json()?)
    }

    fn list_files_page(
        &self,
        issue: &IssueRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestFile>> {
        let url = self.repo_url(issue, &format!("pulls/{}/files", issue.number));
        self.get_page(&url, page, per_page)
    }

    fn list_comments_page(
        &self,
        issue: &IssueRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<IssueComment>> {
        let url = self.repo_url(issue, &format!("issues/{}/comments", issue.number));
        self.get_page(&url, page, per_page)
    }

    fn create_comment(&self, issue: &IssueRef, body: &str) -> Result<IssueComment> {
        let url = self.repo_url(issue, &format!("issues/{}/comments", issue.number));
        let resp = self.request("POST", &url).send_json(json!({ "body": body }))?;
        Ok(resp.into_json()?)
    }

    fn update_comment(
        &self,
        issue: &IssueRef,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let url = self.repo_url(issue, &format!("issues/comments/{}", comment_id));
        let resp = self
            .request("PATCH", &url)
            .send_json(json!({ "body": body }))?;
        Ok(resp.into_json()?)
    }
}
