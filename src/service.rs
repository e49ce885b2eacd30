//! Crawl service
//!
//! Sits in front of the crawl engine: rejects bad seeds, serves a recent
//! stored crawl of the same host when one exists, otherwise runs a new crawl
//! and persists it.

use crate::config::{CacheConfig, Config, CrawlerConfig};
use crate::crawler::{CrawlInstance, InstanceConfig};
use crate::storage::{CrawlRecord, CrawlStore, StorageError};
use crate::url::{hostname, is_http_scheme};
use crate::SitewalkError;
use chrono::{Duration, Utc};

/// Runs crawls and keeps their results in a [`CrawlStore`]
pub struct CrawlerService<S: CrawlStore> {
    store: S,
    crawler: CrawlerConfig,
    freshness: Duration,
}

impl<S: CrawlStore> CrawlerService<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self::with_settings(store, config.crawler.clone(), &config.cache)
    }

    pub fn with_settings(store: S, crawler: CrawlerConfig, cache: &CacheConfig) -> Self {
        Self {
            store,
            crawler,
            freshness: cache.window(),
        }
    }

    /// Crawls a site, or returns a stored crawl of it that is still fresh
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlRecord)` - The stored or newly created crawl
    /// * `Err(SitewalkError::InvalidHost)` - The seed is not an http(s) URL with a host
    pub async fn crawl_site(&mut self, initial_url: &str) -> Result<CrawlRecord, SitewalkError> {
        let host = hostname(initial_url)
            .ok()
            .filter(|_| is_http_scheme(initial_url))
            .ok_or_else(|| SitewalkError::InvalidHost {
                url: initial_url.to_string(),
            })?;
        tracing::info!("Valid host {}", host);

        if let Some(previous) = self.fresh_crawl(&host)? {
            tracing::info!(
                "Crawl of {} from {} is still fresh, returning crawl {}",
                host,
                previous.created_at,
                previous.id
            );
            return Ok(previous);
        }

        tracing::info!("Beginning new web crawl of {}, this may take some time", host);
        let mut instance =
            CrawlInstance::new(initial_url, InstanceConfig::from_crawler_config(&self.crawler)?)?;
        instance.run().await?;
        let report = instance.report();

        if !report.errors.is_empty() {
            tracing::warn!(
                "Detected {} error(s) while crawling {}",
                report.errors.len(),
                host
            );
        }

        let mut record = CrawlRecord::new(initial_url, host, report);
        self.store.save(&mut record).map_err(|e| match e {
            StorageError::Duplicate(id) => SitewalkError::RecordExists { id },
            other => other.into(),
        })?;
        tracing::info!("Saved crawl {} with {} links", record.id, record.links.len());

        Ok(record)
    }

    /// Looks up a stored crawl by id
    pub fn get_crawl(&self, id: &str) -> Result<CrawlRecord, SitewalkError> {
        self.store.get_by_id(id).map_err(|e| match e {
            StorageError::NotFound(id) => SitewalkError::RecordNotFound { id },
            other => other.into(),
        })
    }

    /// Every stored crawl
    pub fn crawl_history(&self) -> Result<Vec<CrawlRecord>, SitewalkError> {
        Ok(self.store.history()?)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Newest stored crawl of `host` inside the freshness window
    fn fresh_crawl(&self, host: &str) -> Result<Option<CrawlRecord>, SitewalkError> {
        let now = Utc::now();
        let previous = self.store.by_host(host)?;
        Ok(previous
            .into_iter()
            .rev()
            .find(|record| record.is_fresh(self.freshness, now)))
    }
}
