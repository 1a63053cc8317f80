use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of activity record a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum RecordKind {
    MergedPrs,
    Releases,
    Issues,
}

impl RecordKind {
    /// Column header for the record's timestamp field
    pub fn timestamp_column(self) -> &'static str {
        match self {
            RecordKind::MergedPrs => "merged_at",
            RecordKind::Releases => "published_at",
            RecordKind::Issues => "created_at",
        }
    }

    /// Heading used in the report title
    pub fn title(self) -> &'static str {
        match self {
            RecordKind::MergedPrs => "Merged Pull Requests",
            RecordKind::Releases => "Releases",
            RecordKind::Issues => "Issues",
        }
    }

    /// Slug used in output file names
    pub fn slug(self) -> &'static str {
        match self {
            RecordKind::MergedPrs => "merged-prs",
            RecordKind::Releases => "releases",
            RecordKind::Issues => "issues",
        }
    }
}

/// A repository to report on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse owner and repo from "owner/repo" format
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = value.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
            anyhow::bail!("Invalid repo format. Expected 'owner/repo', got: {}", value);
        }
        Ok(Self::new(parts[0].trim(), parts[1].trim()))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A release as returned by the releases endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A pull request as returned by the pulls endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// An issue as returned by the issues endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    /// Present when the "issue" is really a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl RawIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Common view over the raw record variants
pub trait ActivityRecord {
    const KIND: RecordKind;

    /// Text shown in the `num` column
    fn number_label(&self) -> String;
    fn title(&self) -> &str;
    fn html_url(&self) -> &str;
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

impl ActivityRecord for RawPullRequest {
    const KIND: RecordKind = RecordKind::MergedPrs;

    fn number_label(&self) -> String {
        self.number.to_string()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn html_url(&self) -> &str {
        &self.html_url
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }
}

impl ActivityRecord for RawRelease {
    const KIND: RecordKind = RecordKind::Releases;

    fn number_label(&self) -> String {
        self.tag_name.clone()
    }

    fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }

    fn html_url(&self) -> &str {
        &self.html_url
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

impl ActivityRecord for RawIssue {
    const KIND: RecordKind = RecordKind::Issues;

    fn number_label(&self) -> String {
        self.number.to_string()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn html_url(&self) -> &str {
        &self.html_url
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// One normalized table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRow {
    pub timestamp_column: &'static str,
    /// YYYY-MM-DD
    pub timestamp: String,
    pub num: String,
    pub title: String,
}

impl FormattedRow {
    /// Column names and cell values, in table order
    pub fn columns(&self) -> [(&str, &str); 3] {
        [
            (self.timestamp_column, self.timestamp.as_str()),
            ("num", self.num.as_str()),
            ("title", self.title.as_str()),
        ]
    }
}

/// Formatted rows for a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub owner: String,
    pub repo: String,
    pub rows: Vec<FormattedRow>,
}
