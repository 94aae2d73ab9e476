//! GitHub REST API client for fetching PRs, commits and review comments

use chrono::{DateTime, Utc};
use common::config::DEFAULT_API_URL;
use common::timestamp::parse_timestamp;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const PER_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    max_pages: u32,
}

/// PR as returned by GitHub API.
///
/// Timestamps stay as strings; they are parsed strictly when converted to
/// [`common::models::PullRequest`]. `additions`/`deletions` are only present
/// on the single-PR endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubPr {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
}

/// Review comment as returned by GitHub API
#[derive(Debug, Clone, Deserialize)]
pub struct GithubReviewComment {
    pub id: i64,
    pub created_at: String,
}

/// Commit as returned by GitHub API
#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub commit: GithubCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommitDetail {
    pub committer: GithubCommitSignature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommitSignature {
    pub date: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            token,
            base_url: DEFAULT_API_URL.to_string(),
            max_pages: 50,
        }
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("pr-benchmark/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}", self.base_url, owner, repo)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Follow `page=N` until a short page comes back or `max_pages` is hit
    async fn get_paginated<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        per_page: u32,
    ) -> Result<Vec<T>, ClientError> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let page_url = format!("{}{}page={}&per_page={}", url, separator, page, per_page);
            let items: Vec<T> = self.get(&page_url).await?;
            let fetched = items.len();
            all.extend(items);

            if fetched < per_page as usize {
                break;
            }

            page += 1;
            if page > self.max_pages {
                warn!("Hit pagination limit of {} pages for {}", self.max_pages, url);
                break;
            }
        }

        Ok(all)
    }

    /// Fetch one page of PRs, most recently updated first
    pub async fn list_prs(
        &self,
        owner: &str,
        repo: &str,
        state: &str, // "all", "open", "closed"
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GithubPr>, ClientError> {
        let url = format!(
            "{}/pulls?state={}&page={}&per_page={}&sort=updated&direction=desc",
            self.repo_url(owner, repo),
            state,
            page,
            per_page
        );
        self.get(&url).await
    }

    /// Fetch every open PR, newest first
    pub async fn fetch_open_prs(&self, owner: &str, repo: &str) -> Result<Vec<GithubPr>, ClientError> {
        let url = format!(
            "{}/pulls?state=open&sort=created&direction=desc",
            self.repo_url(owner, repo)
        );
        let prs: Vec<GithubPr> = self.get_paginated(&url, PER_PAGE).await?;
        info!("Fetched {} open PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    /// Fetch closed PRs whose `closed_at` is at or after `cutoff`.
    ///
    /// Pages are walked by `updated_at` descending. A PR is updated when it
    /// is closed, so once a page reaches PRs updated before the cutoff no
    /// later page can hold a match. PRs whose `closed_at` cannot be parsed
    /// are kept so the conversion step reports them.
    pub async fn fetch_closed_prs_since(
        &self,
        owner: &str,
        repo: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<GithubPr>, ClientError> {
        let mut all_prs = Vec::new();
        let mut page = 1u32;

        loop {
            info!("Fetching closed PRs page {} for {}/{}", page, owner, repo);
            let prs = self.list_prs(owner, repo, "closed", page, PER_PAGE).await?;
            let fetched = prs.len();

            let mut should_stop = false;
            for pr in prs {
                if updated_before(&pr, cutoff) {
                    should_stop = true;
                    break;
                }
                if closed_since(&pr, cutoff) {
                    all_prs.push(pr);
                }
            }

            if should_stop || fetched < PER_PAGE as usize {
                debug!("Reached PRs older than cutoff, stopping pagination");
                break;
            }

            page += 1;
            if page > self.max_pages {
                warn!("Hit pagination limit of {} pages", self.max_pages);
                break;
            }
        }

        info!(
            "Fetched {} PRs closed since {} for {}/{}",
            all_prs.len(),
            cutoff,
            owner,
            repo
        );
        Ok(all_prs)
    }

    /// Fetch a single PR, including additions/deletions
    pub async fn get_pr(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<GithubPr, ClientError> {
        let url = format!("{}/pulls/{}", self.repo_url(owner, repo), pr_number);
        self.get(&url).await
    }

    /// Fetch review comments for a PR, oldest first
    pub async fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<GithubReviewComment>, ClientError> {
        let url = format!("{}/pulls/{}/comments", self.repo_url(owner, repo), pr_number);
        self.get_paginated(&url, PER_PAGE).await
    }

    /// Fetch commits for a PR, oldest first
    pub async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<GithubCommit>, ClientError> {
        let url = format!("{}/pulls/{}/commits", self.repo_url(owner, repo), pr_number);
        self.get_paginated(&url, PER_PAGE).await
    }
}

fn updated_before(pr: &GithubPr, cutoff: DateTime<Utc>) -> bool {
    pr.updated_at
        .as_deref()
        .and_then(|u| parse_timestamp("updated_at", u).ok())
        .is_some_and(|updated| updated < cutoff)
}

fn closed_since(pr: &GithubPr, cutoff: DateTime<Utc>) -> bool {
    match pr.closed_at.as_deref() {
        Some(closed) => match parse_timestamp("closed_at", closed) {
            Ok(closed) => closed >= cutoff,
            Err(_) => true,
        },
        None => false,
    }
}
