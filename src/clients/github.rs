//! GitHub issues client.
//!
//! Lists open sentinel-labelled issues and applies the create/close
//! batches. Every call is independent and fail-fast; rate limiting beyond
//! the orchestrator's settle pause is left to GitHub's own responses.

use serde::Deserialize;
use serde_json::json;

use crate::errors::SyncError;
use crate::models::issue::{IssueCreate, TrackedItem, SENTINEL_LABEL_NAME};

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: u32 = 100;

pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
    base_url: String,
}

/// Issue shape returned by the list endpoint (subset).
#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    #[serde(default)]
    labels: Vec<LabelPayload>,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: String,
}

impl GithubClient {
    pub fn new(token: &str, owner: &str, repo: &str) -> Self {
        Self::with_base_url(token, owner, repo, API_BASE)
    }

    /// Base-URL override for tests against a local server.
    pub fn with_base_url(token: &str, owner: &str, repo: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List all open issues carrying the sentinel label, following
    /// page-sized chunks until a short page.
    pub async fn list_open_issues(&self) -> Result<Vec<TrackedItem>, SyncError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues?labels={}&state=open&per_page={}&page={}",
                self.base_url, self.owner, self.repo, SENTINEL_LABEL_NAME, PAGE_SIZE, page
            );
            let response = self
                .request(reqwest::Method::GET, &url)
                .send()
                .await
                .map_err(|err| SyncError::Fetch(format!("GitHub issue list failed: {err}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SyncError::Fetch(format!(
                    "GitHub issue list returned {status}"
                )));
            }

            let payload: Vec<IssuePayload> = response
                .json()
                .await
                .map_err(|err| SyncError::Fetch(format!("GitHub issue payload invalid: {err}")))?;
            let page_len = payload.len();

            items.extend(payload.into_iter().map(|issue| TrackedItem {
                number: issue.number,
                title: issue.title,
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
            }));

            if page_len < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        tracing::debug!(open_issues = items.len(), "fetched open issue snapshot");
        Ok(items)
    }

    /// Create one issue with title, markdown body, and labels.
    pub async fn create_issue(&self, issue: &IssueCreate) -> Result<(), SyncError> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, self.owner, self.repo);
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(issue)
            .send()
            .await
            .map_err(|err| {
                SyncError::Mutation(format!("create issue '{}' failed: {err}", issue.title))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Mutation(format!(
                "create issue '{}' returned {status}",
                issue.title
            )));
        }
        Ok(())
    }

    /// Transition one issue to closed, keeping its title untouched.
    pub async fn close_issue(&self, item: &TrackedItem) -> Result<(), SyncError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}",
            self.base_url, self.owner, self.repo, item.number
        );
        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&json!({
                "state": "closed",
                "title": item.title,
            }))
            .send()
            .await
            .map_err(|err| {
                SyncError::Mutation(format!("close issue #{} failed: {err}", item.number))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Mutation(format!(
                "close issue #{} returned {status}",
                item.number
            )));
        }
        Ok(())
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(reqwest::header::USER_AGENT, "veracode-sync")
    }
}
