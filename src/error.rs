use thiserror::Error;

/// Failure to retrieve records from the hosting API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub API request failed for {repo} ({endpoint}): {source}")]
    Api {
        repo: String,
        endpoint: &'static str,
        #[source]
        source: octocrab::Error,
    },
}

/// Failure to normalize a raw record into a table row
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("record {number} has no {field} timestamp")]
    MissingTimestamp { number: String, field: &'static str },
}
