//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl:
//! run information, totals, and every failed page or resource.

use crate::output::CrawlReport;
use crate::MirrorError;
use std::path::Path;

/// Failed items listed per section before the rest are elided
const MAX_LISTED_FAILURES: usize = 50;

/// Writes the markdown summary of `report` to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(MirrorError)` - Failed to create the parent folder or the file
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> Result<(), MirrorError> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| MirrorError::File {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(output_path, markdown).map_err(|source| MirrorError::File {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Site-Mirror Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", report.start_url));
    md.push_str(&format!(
        "- **Output Folder**: {}\n",
        report.base_folder.display()
    ));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Totals
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Item | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Pages saved | {} |\n", report.pages.len()));
    md.push_str(&format!("| Pages failed | {} |\n", report.page_failures.len()));
    md.push_str(&format!(
        "| Resources downloaded | {} |\n",
        report.saved_downloads().count()
    ));
    md.push_str(&format!(
        "| Resources failed | {} |\n",
        report.failed_downloads().count()
    ));
    md.push_str(&format!(
        "| Duplicate resources skipped | {} |\n",
        report.duplicate_resources_skipped
    ));
    md.push_str(&format!(
        "| Duplicate page links skipped | {} |\n",
        report.duplicate_pages_skipped
    ));
    md.push_str(&format!(
        "| Off-origin links filtered | {} |\n",
        report.off_origin_links
    ));
    md.push_str(&format!("| Peak concurrent jobs | {} |\n\n", report.peak_workers));
    md.push_str(&format!("**Success Rate**: {:.2}%\n\n", report.success_rate()));

    // Failed pages
    if !report.page_failures.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for failure in report.page_failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {} |\n",
                failure.url,
                escape_cell(&failure.reason)
            ));
        }
        push_elided(&mut md, report.page_failures.len());
    }

    // Failed resources
    let failed: Vec<_> = report.failed_downloads().collect();
    if !failed.is_empty() {
        md.push_str("## Failed Resources\n\n");
        md.push_str("| URL | Attempts | Reason |\n");
        md.push_str("|-----|----------|--------|\n");
        for outcome in failed.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                outcome.url,
                outcome.attempts,
                escape_cell(outcome.error.as_deref().unwrap_or_default())
            ));
        }
        push_elided(&mut md, failed.len());
    }

    md
}

fn push_elided(md: &mut String, total: usize) {
    if total > MAX_LISTED_FAILURES {
        md.push_str(&format!("\n... and {} more\n\n", total - MAX_LISTED_FAILURES));
    } else {
        md.push('\n');
    }
}

/// Keeps a value inside one markdown table cell
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::DownloadOutcome;
    use std::path::PathBuf;

    fn create_test_report() -> CrawlReport {
        let mut report = CrawlReport::new("https://example.com/", "website");
        report.config_hash = Some("abc123".to_string());
        report.record_page("https://example.com/", PathBuf::from("website/index.html"));
        report.record_page("https://example.com/about", PathBuf::from("website/about.html"));
        report.off_origin_links = 7;
        report.finish();
        report
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_report());

        assert!(markdown.contains("# Site-Mirror Crawl Summary"));
        assert!(markdown.contains("- **Start URL**: https://example.com/"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| Pages saved | 2 |"));
        assert!(markdown.contains("| Off-origin links filtered | 7 |"));
        assert!(!markdown.contains("## Failed Pages"));
    }

    #[test]
    fn test_markdown_lists_failures() {
        let mut report = create_test_report();
        report.record_page_failure("https://example.com/gone", "HTTP status 404 | gone");
        report.record_download(DownloadOutcome {
            url: "https://example.com/broken.js".to_string(),
            path: None,
            error: Some("HTTP status 500".to_string()),
            attempts: 3,
        });

        let markdown = format_markdown_summary(&report);

        assert!(markdown.contains("## Failed Pages"));
        assert!(markdown.contains("| https://example.com/gone | HTTP status 404 \\| gone |"));
        assert!(markdown.contains("## Failed Resources"));
        assert!(markdown.contains("| https://example.com/broken.js | 3 | HTTP status 500 |"));
    }

    #[test]
    fn test_generate_markdown_summary_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("SUMMARY.md");

        generate_markdown_summary(&create_test_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Site-Mirror Crawl Summary"));
    }
}
