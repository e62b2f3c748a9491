use serde::Deserialize;

/// User agent sent with page requests unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Site-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Capacity of the shared worker pool
    pub workers: usize,

    /// Total attempts per resource download
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Backoff before retry `n` is `backoff_base_ms * 2^n` (milliseconds)
    pub backoff_base_ms: u64,

    /// What to do with a resource whose download failed
    pub failed_resources: FailedResourcePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            max_retries: 3,
            request_timeout_secs: 30,
            backoff_base_ms: 1000,
            failed_resources: FailedResourcePolicy::Skip,
        }
    }
}

/// Policy for resources whose download failed after all retries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailedResourcePolicy {
    /// Keep the claim; the URL is not attempted again during this crawl
    #[default]
    Skip,

    /// Release the claim; a later page referencing the URL schedules it again
    RetryOnRediscovery,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value for page requests
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Folder the site is mirrored into
    pub base_folder: String,

    /// Where to write the markdown crawl summary, if anywhere
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_folder: "website".to_string(),
            summary_path: None,
        }
    }
}
