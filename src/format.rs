use crate::error::FormatError;
use crate::models::{ActivityRecord, FormattedRow};

/// Titles longer than this are truncated
const TITLE_LIMIT: usize = 40;
/// Number of characters kept when a title is truncated
const TITLE_KEEP: usize = 50;

/// Normalize raw records into table rows, preserving input order
pub fn format_records<R: ActivityRecord>(records: &[R]) -> Result<Vec<FormattedRow>, FormatError> {
    records.iter().map(format_record).collect()
}

pub fn format_record<R: ActivityRecord>(record: &R) -> Result<FormattedRow, FormatError> {
    let timestamp = record
        .timestamp()
        .ok_or_else(|| FormatError::MissingTimestamp {
            number: record.number_label(),
            field: R::KIND.timestamp_column(),
        })?;

    let url = record.html_url();

    Ok(FormattedRow {
        timestamp_column: R::KIND.timestamp_column(),
        timestamp: timestamp.format("%Y-%m-%d").to_string(),
        num: format!("[{}]({})", record.number_label(), url),
        title: format!("[{}]({})", truncate_title(record.title()), url),
    })
}

/// Truncate a title the way the report has always done it: anything over
/// 40 characters keeps its first 50 and gains a "..." suffix.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_LIMIT {
        let kept: String = title.chars().take(TITLE_KEEP).collect();
        format!("{}...", kept)
    } else {
        title.to_string()
    }
}
