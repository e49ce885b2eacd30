//! Sitewalk: a single-site web crawler
//!
//! This crate starts from one URL, follows every same-host anchor link it can
//! reach, fetches each distinct page exactly once and reports the visited set
//! together with the per-link failures met along the way.

pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod storage;
pub mod url;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Sitewalk operations
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL has no valid host: {url}")]
    InvalidHost { url: String },

    #[error("Crawl instance has already been run")]
    AlreadyRun,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crawl record already exists: {id}")]
    RecordExists { id: String },

    #[error("Crawl record not found: {id}")]
    RecordNotFound { id: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No HTTP client configured")]
    MissingClient,
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("hostname is invalid, must be of http or https scheme: {0}")]
    InvalidHost(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("Cannot resolve {reference} against {base}: {reason}")]
    Resolution {
        reference: String,
        base: String,
        reason: String,
    },
}

/// A failure confined to a single link
///
/// These never abort a crawl. They are collected while the crawl runs and
/// handed back next to the visited links once it settles.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlError {
    #[error("error fetching page {url}: {cause}")]
    Fetch { url: String, cause: String },

    #[error("error getting absolute url for {url} (base {base}): {cause}")]
    Resolution {
        url: String,
        base: String,
        cause: String,
    },
}

impl CrawlError {
    pub fn fetch(url: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    pub fn resolution(
        url: impl Into<String>,
        base: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::Resolution {
            url: url.into(),
            base: base.into(),
            cause: cause.to_string(),
        }
    }

    /// The URL (or raw reference) this error is about
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Resolution { url, .. } => url,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlInstance, CrawlReport, InstanceConfig};
pub use service::CrawlerService;
pub use storage::{CrawlRecord, CrawlStore, MemoryStore, SqliteStore};
