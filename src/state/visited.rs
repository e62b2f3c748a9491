/// Visited-state tracking shared by all jobs of a crawl
///
/// Every scheduling decision goes through [`VisitedSet::try_claim`], which
/// tests membership and inserts under the same lock.
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// A set of URLs that have already been scheduled
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims a URL
    ///
    /// # Returns
    ///
    /// * `true` - This call inserted the URL; the caller owns the work
    /// * `false` - The URL was already claimed; the caller must skip it
    pub fn try_claim(&self, url: &Url) -> bool {
        self.lock().insert(url.as_str().to_string())
    }

    /// Returns true if the URL has been claimed
    ///
    /// A `true` answer may be used to skip work that is already claimed. A
    /// `false` answer grants nothing: the work still has to be claimed with
    /// [`VisitedSet::try_claim`], since another caller may claim it first.
    pub fn contains(&self, url: &Url) -> bool {
        self.lock().contains(url.as_str())
    }

    /// Gives a claim back so the URL can be scheduled again
    ///
    /// Only used when failed downloads are configured to be retried on
    /// rediscovery.
    pub(crate) fn release(&self, url: &Url) -> bool {
        self.lock().remove(url.as_str())
    }

    /// Returns the number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the claimed URLs in sorted order
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
