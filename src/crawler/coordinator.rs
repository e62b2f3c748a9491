//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator is the only producer of work. It claims the start page,
//! submits page and resource jobs to the shared [`Scheduler`], and folds
//! every completed job back into the [`CrawlReport`]:
//! - a finished page yields resources to download and links to follow
//! - a finished download is recorded as saved, failed, or skipped
//!
//! The crawl ends when the scheduler has nothing pending or running.

use crate::crawler::downloader::{DownloadOutcome, ResourceDownloader, RetryPolicy};
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::page::{fetch_page, CrawlTask, ExtractedPage};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::CrawlOptions;
use crate::output::CrawlReport;
use crate::state::VisitedSet;
use crate::storage::ResourceStore;
use crate::url::{normalize_url, Origin};
use crate::MirrorError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use url::Url;

/// Result of one scheduled job
enum JobResult {
    Page {
        url: Url,
        result: Result<ExtractedPage, MirrorError>,
    },
    Resource(DownloadOutcome),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    origin: Origin,
    fetcher: Arc<HttpFetcher>,
    store: Arc<ResourceStore>,
    downloader: Arc<ResourceDownloader>,
    visited_pages: VisitedSet,
    scheduler: Scheduler<JobResult>,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a coordinator for a crawl starting at `start_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - The start URL is not an absolute HTTP(S) URL or
    ///   the HTTP client could not be built
    pub fn new(start_url: &str, options: &CrawlOptions) -> Result<Self, MirrorError> {
        let start = normalize_url(start_url)?;
        let origin = Origin::of(&start)?;

        let fetcher = Arc::new(HttpFetcher::new(
            options.request_timeout,
            options.user_agent.clone(),
        )?);
        let store = Arc::new(ResourceStore::new(&options.base_folder));
        let downloader = Arc::new(ResourceDownloader::new(
            Arc::clone(&fetcher),
            Arc::clone(&store),
            Arc::new(VisitedSet::new()),
            RetryPolicy {
                max_retries: options.max_retries,
                backoff_base: options.backoff_base,
            },
            options.failed_resources,
        ));

        let mut report = CrawlReport::new(start.as_str(), &options.base_folder);
        report.config_hash = options.config_hash.clone();

        let mut coordinator = Self {
            origin,
            fetcher,
            store,
            downloader,
            visited_pages: VisitedSet::new(),
            scheduler: Scheduler::new(options.workers),
            report,
        };
        coordinator.visited_pages.try_claim(&start);
        coordinator.schedule_page(start);

        Ok(coordinator)
    }

    /// Runs the crawl to completion
    ///
    /// Individual page or resource failures are recorded in the report; only
    /// failing to create the base folder aborts the crawl.
    pub async fn run(mut self) -> Result<CrawlReport, MirrorError> {
        self.store.prepare().await?;

        tracing::info!(
            "Starting crawl of {} into {} with {} workers",
            self.report.start_url,
            self.store.base_folder().display(),
            self.scheduler.capacity()
        );

        while let Some(joined) = self.scheduler.next_completed().await {
            match joined {
                Ok(JobResult::Page { url, result }) => self.handle_page(url, result),
                Ok(JobResult::Resource(outcome)) => self.report.record_download(outcome),
                Err(e) => {
                    tracing::error!("Worker task failed: {}", e);
                    self.report.record_page_failure("<unknown>", e.to_string());
                }
            }
        }

        self.report.peak_workers = self.scheduler.peak_running();
        self.report.finish();

        tracing::info!(
            "Crawl completed: {} pages saved, {} resources downloaded, {} failures in {:.2}s",
            self.report.pages.len(),
            self.report.saved_downloads().count(),
            self.report.total_errors(),
            self.report.duration_seconds().unwrap_or_default()
        );

        Ok(self.report)
    }

    fn handle_page(&mut self, url: Url, result: Result<ExtractedPage, MirrorError>) {
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch page {}: {}", url, e);
                self.report.record_page_failure(url.as_str(), e.to_string());
                return;
            }
        };

        self.report.record_page(page.url.as_str(), page.saved_path);
        self.report.off_origin_links += page.off_origin_links as u64;

        for resource in page.resources {
            self.schedule_resource(resource);
        }

        for link in page.links {
            if self.visited_pages.try_claim(&link) {
                self.schedule_page(link);
            } else {
                self.report.duplicate_pages_skipped += 1;
            }
        }

        tracing::debug!(
            "{} jobs outstanding after {}",
            self.scheduler.outstanding(),
            url
        );
    }

    /// Submits a page job for an already claimed URL
    fn schedule_page(&mut self, url: Url) {
        tracing::debug!("Scheduling page {}", url);

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let task = CrawlTask {
            url,
            origin: self.origin.clone(),
        };

        self.scheduler.submit(async move {
            let result = AssertUnwindSafe(fetch_page(&fetcher, &store, &task))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(MirrorError::Task(format!("page job for {} panicked", task.url)))
                });
            JobResult::Page {
                url: task.url,
                result,
            }
        });
    }

    /// Submits a resource job unless the URL is already claimed
    ///
    /// The claim itself happens inside the job. The membership check here
    /// only keeps already claimed URLs out of the queue; two jobs for an
    /// unclaimed URL may still be queued, and the second one skips.
    fn schedule_resource(&mut self, url: Url) {
        if self.downloader.visited().contains(&url) {
            tracing::debug!("Skipping already scheduled resource {}", url);
            self.report.duplicate_resources_skipped += 1;
            return;
        }

        let downloader = Arc::clone(&self.downloader);
        self.scheduler.submit(async move {
            let outcome = AssertUnwindSafe(downloader.download(&url))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| DownloadOutcome {
                    url: url.to_string(),
                    path: None,
                    error: Some(format!("resource job for {} panicked", url)),
                    attempts: 0,
                });
            JobResult::Resource(outcome)
        });
    }
}

/// Runs a complete crawl
pub async fn run_crawl(start_url: &str, options: CrawlOptions) -> Result<CrawlReport, MirrorError> {
    Coordinator::new(start_url, &options)?.run().await
}
