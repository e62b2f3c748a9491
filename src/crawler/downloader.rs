//! Resource downloader with bounded retries
//!
//! Each resource URL is claimed once per crawl. A claimed URL is fetched with
//! exponential backoff between attempts, classified, and written below the
//! base folder. Failures are reported in the [`DownloadOutcome`], never raised.

use crate::config::FailedResourcePolicy;
use crate::crawler::fetcher::{FetchedResource, HttpFetcher};
use crate::state::VisitedSet;
use crate::storage::{classify, resource_filename, ResourceStore};
use crate::MirrorError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result of one download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// The resource URL
    pub url: String,

    /// Where the body was written, on success
    pub path: Option<PathBuf>,

    /// Why the download failed, on failure
    pub error: Option<String>,

    /// Number of HTTP attempts made; 0 when the URL was already claimed
    pub attempts: u32,
}

/// Coarse state of a [`DownloadOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Saved,
    Failed,
    Skipped,
}

impl DownloadOutcome {
    fn skipped(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            path: None,
            error: None,
            attempts: 0,
        }
    }

    fn saved(url: &Url, path: PathBuf, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            path: Some(path),
            error: None,
            attempts,
        }
    }

    fn failed(url: &Url, error: &MirrorError, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            path: None,
            error: Some(error.to_string()),
            attempts,
        }
    }

    pub fn status(&self) -> DownloadStatus {
        match (&self.path, &self.error) {
            (Some(_), _) => DownloadStatus::Saved,
            (None, Some(_)) => DownloadStatus::Failed,
            (None, None) => DownloadStatus::Skipped,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.status() == DownloadStatus::Saved
    }

    pub fn is_failed(&self) -> bool {
        self.status() == DownloadStatus::Failed
    }

    pub fn is_skipped(&self) -> bool {
        self.status() == DownloadStatus::Skipped
    }
}

/// Attempt budget and backoff schedule for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: u32,

    /// Delay after the first failed attempt; doubles after each further one
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-based): `backoff_base * 2^attempt`
    ///
    /// # Example
    ///
    /// ```
    /// use site_mirror::crawler::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.backoff(0), Duration::from_secs(1));
    /// assert_eq!(policy.backoff(2), Duration::from_secs(4));
    /// ```
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Downloads resources into a [`ResourceStore`]
#[derive(Debug)]
pub struct ResourceDownloader {
    fetcher: Arc<HttpFetcher>,
    store: Arc<ResourceStore>,
    visited: Arc<VisitedSet>,
    retry: RetryPolicy,
    on_failure: FailedResourcePolicy,
}

impl ResourceDownloader {
    pub fn new(
        fetcher: Arc<HttpFetcher>,
        store: Arc<ResourceStore>,
        visited: Arc<VisitedSet>,
        retry: RetryPolicy,
        on_failure: FailedResourcePolicy,
    ) -> Self {
        Self {
            fetcher,
            store,
            visited,
            retry,
            on_failure,
        }
    }

    /// Returns the visited-resource set this downloader claims from
    pub fn visited(&self) -> &Arc<VisitedSet> {
        &self.visited
    }

    /// Downloads one resource unless it has already been claimed
    ///
    /// # Download Flow
    ///
    /// 1. Claim the URL; skip if another job already did
    /// 2. GET with retries (see [`RetryPolicy`])
    /// 3. Classify by content type, falling back to the URL suffix
    /// 4. Write the body under `<base>/<subfolder>/`, avoiding name collisions
    ///
    /// Under [`FailedResourcePolicy::RetryOnRediscovery`] a failed download
    /// gives its claim back.
    pub async fn download(&self, url: &Url) -> DownloadOutcome {
        if !self.visited.try_claim(url) {
            tracing::debug!("Skipping already scheduled resource {}", url);
            return DownloadOutcome::skipped(url);
        }

        let outcome = self.fetch_and_store(url).await;

        if outcome.is_failed() && self.on_failure == FailedResourcePolicy::RetryOnRediscovery {
            self.visited.release(url);
        }

        outcome
    }

    async fn fetch_and_store(&self, url: &Url) -> DownloadOutcome {
        let (resource, attempts) = match self.fetch_with_retry(url).await {
            Ok(fetched) => fetched,
            Err((e, attempts)) => {
                tracing::warn!(
                    "Failed to download {} after {} attempts. Reason: {}",
                    url,
                    attempts,
                    e
                );
                return DownloadOutcome::failed(url, &e, attempts);
            }
        };

        let classification = classify(resource.content_type.as_deref(), url);
        let filename = resource_filename(url, &classification);

        match self
            .store
            .store_resource(&classification, &filename, &resource.body)
            .await
        {
            Ok(path) => {
                tracing::info!("Downloaded {} to {}", url, path.display());
                DownloadOutcome::saved(url, path, attempts)
            }
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", url, e);
                DownloadOutcome::failed(url, &e, attempts)
            }
        }
    }

    /// Fetches with the retry budget, returning the attempts used either way
    async fn fetch_with_retry(
        &self,
        url: &Url,
    ) -> Result<(FetchedResource, u32), (MirrorError, u32)> {
        let mut attempt = 0;
        loop {
            let attempts = attempt + 1;
            match self.fetcher.fetch_resource(url).await {
                Ok(resource) => {
                    if resource.final_url != *url {
                        tracing::debug!("{} redirected to {}", url, resource.final_url);
                    }
                    return Ok((resource, attempts));
                }
                Err(e) if e.is_transient() && attempts < self.retry.max_retries => {
                    tracing::warn!("Attempt {} failed for {}: {}", attempts, url, e);
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err((e, attempts)),
            }
        }
    }
}
