//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the request timeout
//! - Page GETs, which carry the configured user agent
//! - Resource GETs, which are sent without one
//! - Turning non-2xx statuses into errors the downloader can retry

use crate::MirrorError;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// A successfully fetched resource body
#[derive(Debug)]
pub struct FetchedResource {
    /// Final URL after redirects
    pub final_url: Url,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds an HTTP client with the given request timeout
///
/// Redirects, compression and TLS follow the library defaults. No default
/// user agent is set; page requests add one per request.
///
/// # Example
///
/// ```no_run
/// use site_mirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared HTTP access for page and resource jobs
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, MirrorError> {
        let client = build_http_client(timeout)?;
        Ok(Self::with_client(client, user_agent))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    /// Fetches a page and returns its decoded body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page text, decoded per the response charset
    /// * `Err(MirrorError::Status)` - The server answered with a non-2xx status
    /// * `Err(MirrorError::Http)` - Timeout, connection or body error
    pub async fn fetch_page(&self, url: &Url) -> Result<String, MirrorError> {
        let request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent);
        let response = send(request, url).await?;

        response.text().await.map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches a resource body without a user agent
    pub async fn fetch_resource(&self, url: &Url) -> Result<FetchedResource, MirrorError> {
        let response = send(self.client.get(url.clone()), url).await?;

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedResource {
            final_url,
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Sends a request and rejects non-2xx responses
async fn send(request: RequestBuilder, url: &Url) -> Result<Response, MirrorError> {
    let response = request.send().await.map_err(|source| MirrorError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
