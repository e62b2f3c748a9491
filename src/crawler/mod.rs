//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and resources
//! - HTML parsing, pretty-printing and reference extraction
//! - Resource downloads with retry and backoff
//! - The shared worker pool and the crawl coordinator

mod coordinator;
mod downloader;
mod fetcher;
mod page;
mod parser;
mod pretty;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use downloader::{DownloadOutcome, DownloadStatus, ResourceDownloader, RetryPolicy};
pub use fetcher::{build_http_client, FetchedResource, HttpFetcher};
pub use page::{fetch_page, CrawlTask, ExtractedPage};
pub use parser::{parse_page, ParsedPage};
pub use pretty::pretty_print;
pub use scheduler::Scheduler;

use crate::config::{Config, FailedResourcePolicy};
use crate::output::CrawlReport;
use crate::MirrorError;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Folder everything is written below
    pub base_folder: PathBuf,

    /// Size of the shared worker pool
    pub workers: usize,

    /// Total attempts per resource
    pub max_retries: u32,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Delay after the first failed resource attempt
    pub backoff_base: Duration,

    /// User agent sent with page requests
    pub user_agent: String,

    /// What a failed resource download does to its claim
    pub failed_resources: FailedResourcePolicy,

    /// Hash of the configuration file, copied into the report
    pub config_hash: Option<String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CrawlOptions {
    /// Builds options from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_folder: PathBuf::from(&config.output.base_folder),
            workers: config.crawler.workers,
            max_retries: config.crawler.max_retries,
            request_timeout: Duration::from_secs(config.crawler.request_timeout_secs),
            backoff_base: Duration::from_millis(config.crawler.backoff_base_ms),
            user_agent: config.user_agent.value.clone(),
            failed_resources: config.crawler.failed_resources,
            config_hash: None,
        }
    }
}

/// Mirrors the site at `start_url` into `options.base_folder`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the start URL and derive the crawl origin
/// 2. Create the base folder
/// 3. Fetch pages and download resources on a shared worker pool
/// 4. Follow same-origin links until no unvisited pages remain
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished; individual failures are in the report
/// * `Err(MirrorError)` - Invalid start URL or the base folder could not be created
pub async fn crawl(start_url: &str, options: CrawlOptions) -> Result<CrawlReport, MirrorError> {
    run_crawl(start_url, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_default_config() {
        let options = CrawlOptions::default();

        assert_eq!(options.base_folder, PathBuf::from("website"));
        assert_eq!(options.workers, 10);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.request_timeout, Duration::from_secs(30));
        assert_eq!(options.backoff_base, Duration::from_secs(1));
        assert_eq!(options.failed_resources, FailedResourcePolicy::Skip);
    }
}
