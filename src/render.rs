use crate::models::{FormattedRow, RecordKind, RepositoryReport};
use crate::window::DateWindow;

/// Emitted instead of a table when a repository has no rows
pub const NO_DATA_PLACEHOLDER: &str = "# Dev Report: \n\nNo data available.";

/// Render rows as a GitHub-flavored Markdown pipe table
pub fn render_table(rows: &[FormattedRow]) -> String {
    let Some(first) = rows.first() else {
        return NO_DATA_PLACEHOLDER.to_string();
    };

    let headers: Vec<&str> = first.columns().iter().map(|(name, _)| *name).collect();

    let mut md = String::new();
    md.push_str(&format!("| {} |\n", headers.join(" | ")));
    md.push_str(&format!(
        "| {} |\n",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
    ));

    for row in rows {
        let cells: Vec<&str> = row.columns().iter().map(|(_, cell)| *cell).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

/// Render the full report: title, table of contents, then one table per repository
pub fn render_document(
    kind: RecordKind,
    organization: &str,
    window: &DateWindow,
    reports: &[RepositoryReport],
) -> String {
    let mut md = format!(
        "# {} {} for {} {}\n\n",
        organization,
        kind.title(),
        window.month_label,
        window.year
    );

    md.push_str("## Table of Contents\n\n");
    for report in reports {
        md.push_str(&format!(
            "- [{}](#{})\n",
            report.repo.to_uppercase(),
            report.repo.to_lowercase()
        ));
    }

    md.push_str("\n-------------------------------------------------\n");

    for report in reports {
        md.push_str(&format!("\n## {}\n\n", report.repo.to_uppercase()));
        md.push_str(&render_table(&report.rows));
    }

    md
}

/// Total number of rows across all repositories
pub fn count_rows(reports: &[RepositoryReport]) -> usize {
    reports.iter().map(|r| r.rows.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: u32) -> FormattedRow {
        FormattedRow {
            timestamp_column: "merged_at",
            timestamp: format!("2024-03-{:02}", n),
            num: format!("[{}](https://x/{})", n, n),
            title: format!("[Title {}](https://x/{})", n, n),
        }
    }

    fn report(repo: &str, rows: Vec<FormattedRow>) -> RepositoryReport {
        RepositoryReport {
            owner: "near".to_string(),
            repo: repo.to_string(),
            rows,
        }
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[row(1), row(2)]);

        let expected = "| merged_at | num | title |\n\
                        | --- | --- | --- |\n\
                        | 2024-03-01 | [1](https://x/1) | [Title 1](https://x/1) |\n\
                        | 2024-03-02 | [2](https://x/2) | [Title 2](https://x/2) |\n";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&[]);
        assert_eq!(table, NO_DATA_PLACEHOLDER);
        assert!(table.contains("No data available."));
        assert!(!table.contains('|'));
    }

    #[test]
    fn test_document_keeps_configuration_order() {
        let window = DateWindow::new(3, 2024).unwrap();
        let reports = vec![
            report("sdk", vec![row(1)]),
            report("Core", vec![]),
            report("sdk", vec![row(2)]),
        ];

        let doc = render_document(RecordKind::MergedPrs, "NEAR", &window, &reports);

        assert!(doc.starts_with("# NEAR Merged Pull Requests for March 2024\n\n## Table of Contents\n\n"));
        assert!(doc.contains("- [SDK](#sdk)\n- [CORE](#core)\n- [SDK](#sdk)\n"));

        let sdk = doc.find("\n## SDK\n").unwrap();
        let core = doc.find("\n## CORE\n").unwrap();
        assert!(sdk < core);
        assert_eq!(doc.matches("\n## SDK\n").count(), 2);
        assert!(doc.contains("\n## CORE\n\n# Dev Report: \n\nNo data available."));
    }

    #[test]
    fn test_document_toc_anchors_not_sorted() {
        let window = DateWindow::new(1, 2025).unwrap();
        let reports = vec![report("core", vec![]), report("sdk", vec![])];

        let doc = render_document(RecordKind::Releases, "Acme", &window, &reports);
        let core = doc.find("(#core)").unwrap();
        let sdk = doc.find("(#sdk)").unwrap();
        assert!(core < sdk);
        assert!(doc.starts_with("# Acme Releases for January 2025"));
    }

    #[test]
    fn test_count_rows() {
        let reports = vec![
            report("a", vec![row(1), row(2)]),
            report("b", vec![]),
            report("c", vec![row(3)]),
        ];
        assert_eq!(count_rows(&reports), 3);
        assert_eq!(count_rows(&[]), 0);
    }
}
