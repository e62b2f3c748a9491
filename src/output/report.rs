//! Crawl report types
//!
//! A [`CrawlReport`] is built up by the coordinator as jobs complete and
//! returned from [`crate::crawl`].

use crate::crawler::DownloadOutcome;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A page that was fetched and written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    /// The page URL
    pub url: String,

    /// Where the HTML was written
    pub path: PathBuf,
}

/// A page that could not be fetched or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// The page URL
    pub url: String,

    /// Error message
    pub reason: String,
}

/// Everything that happened during one crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    // Run metadata
    pub start_url: String,
    pub base_folder: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: Option<String>,

    // Pages
    pub pages: Vec<SavedPage>,
    pub page_failures: Vec<PageFailure>,

    // Resources that were attempted; skipped duplicates are only counted
    pub downloads: Vec<DownloadOutcome>,

    // Scope and de-duplication counters
    pub duplicate_pages_skipped: u64,
    pub duplicate_resources_skipped: u64,
    pub off_origin_links: u64,

    // Pool usage
    pub peak_workers: usize,
}

impl CrawlReport {
    /// Creates an empty report stamped with the current time
    pub fn new(start_url: impl Into<String>, base_folder: impl Into<PathBuf>) -> Self {
        Self {
            start_url: start_url.into(),
            base_folder: base_folder.into(),
            started_at: Utc::now(),
            finished_at: None,
            config_hash: None,
            pages: Vec::new(),
            page_failures: Vec::new(),
            downloads: Vec::new(),
            duplicate_pages_skipped: 0,
            duplicate_resources_skipped: 0,
            off_origin_links: 0,
            peak_workers: 0,
        }
    }

    pub fn record_page(&mut self, url: impl Into<String>, path: PathBuf) {
        self.pages.push(SavedPage {
            url: url.into(),
            path,
        });
    }

    pub fn record_page_failure(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.page_failures.push(PageFailure {
            url: url.into(),
            reason: reason.into(),
        });
    }

    /// Records a download outcome; skipped outcomes only bump the duplicate count
    pub fn record_download(&mut self, outcome: DownloadOutcome) {
        if outcome.is_skipped() {
            self.duplicate_resources_skipped += 1;
        } else {
            self.downloads.push(outcome);
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Returns the duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Downloads that were written to disk
    pub fn saved_downloads(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.downloads.iter().filter(|d| d.is_saved())
    }

    /// Downloads that failed after their retry budget
    pub fn failed_downloads(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.downloads.iter().filter(|d| d.is_failed())
    }

    /// Total number of failed pages and resources
    pub fn total_errors(&self) -> usize {
        self.page_failures.len() + self.failed_downloads().count()
    }

    /// Returns the success rate over all attempted pages and resources as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages.len() + self.page_failures.len() + self.downloads.len();
        if attempted == 0 {
            return 0.0;
        }
        let succeeded = self.pages.len() + self.saved_downloads().count();
        (succeeded as f64 / attempted as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(url: &str, path: Option<&str>, error: Option<&str>, attempts: u32) -> DownloadOutcome {
        DownloadOutcome {
            url: url.to_string(),
            path: path.map(PathBuf::from),
            error: error.map(str::to_string),
            attempts,
        }
    }

    #[test]
    fn test_new_report_is_empty() {
        let report = CrawlReport::new("https://example.com/", "website");

        assert!(report.pages.is_empty());
        assert!(report.finished_at.is_none());
        assert!(report.duration_seconds().is_none());
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_skipped_downloads_are_counted_not_stored() {
        let mut report = CrawlReport::new("https://example.com/", "website");
        report.record_download(outcome("https://example.com/a.png", None, None, 0));
        report.record_download(outcome(
            "https://example.com/b.png",
            Some("website/png/b.png"),
            None,
            1,
        ));

        assert_eq!(report.duplicate_resources_skipped, 1);
        assert_eq!(report.downloads.len(), 1);
    }

    #[test]
    fn test_error_totals_and_success_rate() {
        let mut report = CrawlReport::new("https://example.com/", "website");
        report.record_page("https://example.com/", PathBuf::from("website/index.html"));
        report.record_page_failure("https://example.com/missing", "HTTP status 404");
        report.record_download(outcome(
            "https://example.com/a.css",
            Some("website/css/a.css"),
            None,
            1,
        ));
        report.record_download(outcome(
            "https://example.com/b.js",
            None,
            Some("HTTP status 500"),
            3,
        ));

        assert_eq!(report.total_errors(), 2);
        assert_eq!(report.saved_downloads().count(), 1);
        assert_eq!(report.success_rate(), 50.0);
    }

    #[test]
    fn test_finish_sets_duration() {
        let mut report = CrawlReport::new("https://example.com/", "website");
        report.finish();

        assert!(report.duration_seconds().unwrap() >= 0.0);
    }
}
