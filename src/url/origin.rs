use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The host and explicit port a crawl is confined to
///
/// Two URLs are same-origin when their lowercase hosts are equal and their
/// explicitly written ports are equal. The scheme is not compared, so
/// `http://example.com/` and `https://example.com/about` share an origin.
/// A port equal to the scheme default counts as not written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Extracts the origin of a URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::url::Origin;
    /// use url::Url;
    ///
    /// let origin = Origin::of(&Url::parse("https://Example.COM/path").unwrap()).unwrap();
    /// assert_eq!(origin.host(), "example.com");
    /// assert_eq!(origin.port(), None);
    /// ```
    pub fn of(url: &Url) -> UrlResult<Self> {
        let host = url.host_str().ok_or(UrlError::MissingHost)?;
        Ok(Self {
            host: host.to_lowercase(),
            port: url.port(),
        })
    }

    /// Returns true if `url` belongs to this origin
    pub fn contains(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                host.eq_ignore_ascii_case(&self.host) && url.port() == self.port
            }
            None => false,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(url: &str) -> Origin {
        Origin::of(&Url::parse(url).unwrap()).unwrap()
    }

    #[test]
    fn test_same_host_is_contained() {
        let origin = origin("https://example.com/");
        assert!(origin.contains(&Url::parse("https://example.com/about").unwrap()));
    }

    #[test]
    fn test_host_comparison_ignores_case() {
        let origin = origin("https://example.com/");
        assert!(origin.contains(&Url::parse("https://EXAMPLE.com/about").unwrap()));
    }

    #[test]
    fn test_other_host_is_not_contained() {
        let origin = origin("https://example.com/");
        assert!(!origin.contains(&Url::parse("https://other.com/").unwrap()));
    }

    #[test]
    fn test_subdomain_is_not_contained() {
        let origin = origin("https://example.com/");
        assert!(!origin.contains(&Url::parse("https://blog.example.com/").unwrap()));
    }

    #[test]
    fn test_port_must_match() {
        let origin = origin("http://127.0.0.1:8080/");
        assert!(origin.contains(&Url::parse("http://127.0.0.1:8080/page").unwrap()));
        assert!(!origin.contains(&Url::parse("http://127.0.0.1:9090/page").unwrap()));
    }

    #[test]
    fn test_default_port_counts_as_unwritten() {
        let origin = origin("http://example.com/");
        assert!(origin.contains(&Url::parse("http://example.com:80/page").unwrap()));
        assert!(origin.contains(&Url::parse("https://example.com:443/page").unwrap()));
    }

    #[test]
    fn test_scheme_is_not_compared() {
        let http_origin = origin("http://example.com/");
        assert!(http_origin.contains(&Url::parse("https://example.com/about").unwrap()));
        assert!(origin("https://example.com/").contains(&Url::parse("http://example.com/").unwrap()));
    }

    #[test]
    fn test_explicit_port_differs_from_none() {
        let origin = origin("http://example.com/");
        assert!(!origin.contains(&Url::parse("http://example.com:8080/").unwrap()));
    }

    #[test]
    fn test_display() {
        assert_eq!(origin("http://example.com:8080/").to_string(), "example.com:8080");
    }
}
