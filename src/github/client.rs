use anyhow::{Context, Result};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::GitHubConfig;
use crate::error::FetchError;
use crate::models::{RawIssue, RawPullRequest, RawRelease, RepoRef};
use crate::window::DateWindow;

/// GitHub API client for time-windowed activity queries.
///
/// Every query fetches exactly one page (`per_page`, 100 by default) and
/// filters it client-side against the window. Anything past the first page
/// is not seen.
pub struct GitHubClient {
    client: Octocrab,
    base_branches: Vec<String>,
    per_page: u8,
}

#[derive(Serialize)]
struct PageQuery {
    per_page: u8,
}

#[derive(Serialize)]
struct IssuesQuery {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
}

#[derive(Serialize)]
struct PullsQuery<'a> {
    state: &'static str,
    base: &'a str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
}

impl GitHubClient {
    /// Create a new GitHub client from explicit configuration
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(config.api_base_url.as_str())
            .with_context(|| format!("Invalid GitHub API base URL: {}", config.api_base_url))?
            .add_retry_config(RetryConfig::None);

        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        }

        let client = builder.build().context("Failed to create GitHub client")?;

        Ok(Self {
            client,
            base_branches: config.base_branches.clone(),
            per_page: config.per_page,
        })
    }

    /// Releases published inside the window
    pub async fn releases(
        &self,
        repo: &RepoRef,
        window: &DateWindow,
    ) -> Result<Vec<RawRelease>, FetchError> {
        let page: Vec<RawRelease> = self
            .get_page(
                repo,
                "releases",
                &PageQuery {
                    per_page: self.per_page,
                },
            )
            .await?;

        let releases: Vec<RawRelease> = page
            .into_iter()
            .filter(|r| r.published_at.is_some_and(|at| window.contains(at)))
            .collect();

        info!(repo = %repo, count = releases.len(), "Fetched releases");

        Ok(releases)
    }

    /// Issues (not pull requests) created inside the window
    pub async fn issues(
        &self,
        repo: &RepoRef,
        window: &DateWindow,
    ) -> Result<Vec<RawIssue>, FetchError> {
        let query = IssuesQuery {
            state: "all",
            sort: "created",
            direction: "desc",
            per_page: self.per_page,
        };
        let page: Vec<RawIssue> = self.get_page(repo, "issues", &query).await?;

        let issues: Vec<RawIssue> = page
            .into_iter()
            .filter(|i| !i.is_pull_request() && window.contains(i.created_at))
            .collect();

        info!(repo = %repo, count = issues.len(), "Fetched issues");

        Ok(issues)
    }

    /// Pull requests merged inside the window.
    ///
    /// Base branches are tried in order; the first branch whose page is
    /// non-empty decides the result, even if nothing on it was merged inside
    /// the window. Failures are logged here and returned as `Err` so callers
    /// can tell them apart from an empty month.
    pub async fn merged_pull_requests(
        &self,
        repo: &RepoRef,
        window: &DateWindow,
    ) -> Result<Vec<RawPullRequest>, FetchError> {
        match self.find_merged_pull_requests(repo, window).await {
            Ok(prs) => Ok(prs),
            Err(err) => {
                error!(repo = %repo, error = %err, "Error fetching PRs");
                Err(err)
            }
        }
    }

    async fn find_merged_pull_requests(
        &self,
        repo: &RepoRef,
        window: &DateWindow,
    ) -> Result<Vec<RawPullRequest>, FetchError> {
        for base in &self.base_branches {
            let query = PullsQuery {
                state: "closed",
                base,
                sort: "updated",
                direction: "desc",
                per_page: self.per_page,
            };
            let page: Vec<RawPullRequest> = self.get_page(repo, "pulls", &query).await?;

            if page.is_empty() {
                debug!(repo = %repo, base = %base, "No closed PRs on base branch");
                continue;
            }

            let merged: Vec<RawPullRequest> = page
                .into_iter()
                .filter(|pr| pr.merged_at.is_some_and(|at| window.contains(at)))
                .collect();

            info!(repo = %repo, base = %base, count = merged.len(), "Fetched merged PRs");

            return Ok(merged);
        }

        info!(repo = %repo, "No closed PRs on any base branch");

        Ok(Vec::new())
    }

    async fn get_page<T, P>(
        &self,
        repo: &RepoRef,
        endpoint: &'static str,
        query: &P,
    ) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let route = format!("/repos/{}/{}/{}", repo.owner, repo.repo, endpoint);
        debug!(route = %route, "Requesting page");

        self.client
            .get(route, Some(query))
            .await
            .map_err(|source| FetchError::Api {
                repo: repo.to_string(),
                endpoint,
                source,
            })
    }
}
