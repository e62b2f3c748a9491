//! Page jobs: fetch one page, save it, and report what it references

use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::parser::parse_page;
use crate::storage::{page_filename, ResourceStore};
use crate::url::Origin;
use crate::MirrorError;
use std::path::PathBuf;
use url::Url;

/// One page to crawl
///
/// The base folder is not part of the task; all tasks of a crawl share the
/// coordinator's [`ResourceStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Normalized page URL
    pub url: Url,

    /// Origin every followed link must belong to
    pub origin: Origin,
}

/// What a successfully fetched page yielded
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// The page URL
    pub url: Url,

    /// Where the page HTML was written
    pub saved_path: PathBuf,

    /// Resources the page references
    pub resources: Vec<Url>,

    /// Same-origin pages the page links to
    pub links: Vec<Url>,

    /// Hyperlinks dropped for leaving the origin
    pub off_origin_links: usize,
}

/// Fetches a page, writes its HTML, and extracts resources and links
///
/// # Returns
///
/// * `Ok(ExtractedPage)` - Page saved; its resources and links are ready to schedule
/// * `Err(MirrorError)` - The fetch or the write failed; nothing to schedule
pub async fn fetch_page(
    fetcher: &HttpFetcher,
    store: &ResourceStore,
    task: &CrawlTask,
) -> Result<ExtractedPage, MirrorError> {
    let body = fetcher.fetch_page(&task.url).await?;

    let parsed = parse_page(&body, &task.url, &task.origin);

    let saved_path = store
        .store_page(&page_filename(&task.url), &parsed.html)
        .await?;
    tracing::info!("Saved HTML to {}", saved_path.display());

    Ok(ExtractedPage {
        url: task.url.clone(),
        saved_path,
        resources: parsed.resources,
        links: parsed.links,
        off_origin_links: parsed.off_origin_links,
    })
}
