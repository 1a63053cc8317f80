use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::format::format_records;
use crate::github::GitHubClient;
use crate::models::{FormattedRow, RecordKind, RepoRef, RepositoryReport};
use crate::render::render_document;
use crate::window::DateWindow;

/// Drives fetch, format and render for every configured repository
pub struct ReportPipeline<'a> {
    github: GitHubClient,
    config: &'a Config,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(github: GitHubClient, config: &'a Config) -> Self {
        Self { github, config }
    }

    /// Collect one report per repository, in configuration order.
    ///
    /// Repositories are processed one at a time. A failed merged-PR fetch
    /// skips that repository; any other failure aborts the run.
    pub async fn collect(
        &self,
        kind: RecordKind,
        window: &DateWindow,
    ) -> Result<Vec<RepositoryReport>> {
        info!(
            kind = kind.slug(),
            month = %window.month_label,
            year = window.year,
            repositories = self.config.repositories.len(),
            "Starting report pipeline"
        );

        let mut reports = Vec::with_capacity(self.config.repositories.len());

        for repo in &self.config.repositories {
            let rows = match self.rows_for(kind, repo, window).await? {
                Some(rows) => rows,
                None => continue,
            };

            reports.push(RepositoryReport {
                owner: repo.owner.clone(),
                repo: repo.repo.clone(),
                rows,
            });
        }

        info!(repositories = reports.len(), "Report pipeline complete");

        Ok(reports)
    }

    /// Rows for one repository, or `None` when the repository is skipped
    async fn rows_for(
        &self,
        kind: RecordKind,
        repo: &RepoRef,
        window: &DateWindow,
    ) -> Result<Option<Vec<FormattedRow>>> {
        let rows = match kind {
            RecordKind::MergedPrs => match self.github.merged_pull_requests(repo, window).await {
                Ok(prs) => format_records(&prs),
                Err(err) => {
                    warn!(repo = %repo, error = %err, "Skipping repository, PR fetch failed");
                    return Ok(None);
                }
            },
            RecordKind::Releases => {
                let releases = self
                    .github
                    .releases(repo, window)
                    .await
                    .with_context(|| format!("Failed to fetch releases for {}", repo))?;
                format_records(&releases)
            }
            RecordKind::Issues => {
                let issues = self
                    .github
                    .issues(repo, window)
                    .await
                    .with_context(|| format!("Failed to fetch issues for {}", repo))?;
                format_records(&issues)
            }
        };

        let rows = rows.with_context(|| format!("Failed to format records for {}", repo))?;
        Ok(Some(rows))
    }

    /// Render the collected reports as one Markdown document
    pub fn render(
        &self,
        kind: RecordKind,
        window: &DateWindow,
        reports: &[RepositoryReport],
    ) -> String {
        render_document(kind, &self.config.report.organization, window, reports)
    }
}
