use serde::Deserialize;

/// Default number of simultaneous fetches
pub const DEFAULT_WORKERS: usize = 650;

/// Default per-request HTTP timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default cap on how much of a response body is read (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default age (hours) under which a stored crawl of the same host is reused
pub const DEFAULT_FRESHNESS_HOURS: u64 = 24;

/// Upper bound accepted for the cache freshness window (ten years)
pub const MAX_FRESHNESS_HOURS: u64 = 24 * 365 * 10;

/// Main configuration structure for Sitewalk
///
/// Every table and key is optional; a missing config file and an empty one
/// both yield [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

/// Crawl engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once; also sizes the work queue
    pub workers: usize,

    /// Timeout applied to each HTTP request
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Bytes of a response body read before the rest is dropped
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("sitewalk/{}", env!("CARGO_PKG_VERSION")),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(rename = "freshness-hours")]
    pub freshness_hours: u64,
}

impl CacheConfig {
    /// How long a stored crawl is served instead of re-crawling
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.freshness_hours.min(MAX_FRESHNESS_HOURS) as i64)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_hours: DEFAULT_FRESHNESS_HOURS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database holding past crawls
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path of the JSON report written after each command
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "sitewalk.db".to_string(),
            report_path: "report.json".to_string(),
        }
    }
}
