use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::RecordKind;
use crate::window::DateWindow;

/// File name for a report, e.g. `merged-prs-2024-03.md`
pub fn report_file_name(kind: RecordKind, window: &DateWindow) -> String {
    format!("{}-{}-{}.md", kind.slug(), window.year, window.two_digit_month)
}

/// Write the rendered report, replacing any existing file
pub fn write_report(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!(path = %path.display(), bytes = content.len(), "Report created");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_file_name() {
        let window = DateWindow::new(3, 2024).unwrap();
        assert_eq!(
            report_file_name(RecordKind::MergedPrs, &window),
            "merged-prs-2024-03.md"
        );
        assert_eq!(
            report_file_name(RecordKind::Issues, &window),
            "issues-2024-03.md"
        );
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_report(&path, "first version, longer").unwrap();
        write_report(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("2024").join("report.md");

        write_report(&path, "# Report\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}
