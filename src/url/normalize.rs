use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that never point at something fetchable
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a URL into the key used by the visited sets
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Remove the fragment
///
/// Parsing already lowercases the host, drops default ports and resolves dot
/// segments. Nothing else is rewritten: two URLs that differ in path, query or
/// trailing slash are different pages.
///
/// # Examples
///
/// ```
/// use site_mirror::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM:80/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves an `href`/`src` attribute against the page it appears on
///
/// Returns None if the reference should be ignored:
/// - empty or fragment-only values
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - values that do not resolve to an HTTP(S) URL
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .and_then(|url| normalize_parsed(url).ok())
}
