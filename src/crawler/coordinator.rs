//! Crawler coordinator - one crawl run from seed to fixpoint
//!
//! This module contains the dispatch loop that ties the crawl together:
//! - Seeding the frontier with the initial URL
//! - Spawning one task per admitted URL
//! - Filtering discovered references through the URL policy
//! - Detecting, via the completion tracker, when the frontier has drained

use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{ErrorCollector, Frontier};
use crate::crawler::governor::Governor;
use crate::crawler::parser::extract_hrefs;
use crate::crawler::tracker::{CompletionTracker, CrawlState, FinishGuard};
use crate::config::{validate_crawler_config, CrawlerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::url::{hostname, is_http_scheme, is_same_domain, resolve};
use crate::{ConfigError, CrawlError, SitewalkError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Log a progress line every this many dispatched URLs
const PROGRESS_INTERVAL: usize = 100;

/// Settings injected into a [`CrawlInstance`]
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Governor capacity and work-queue buffer size
    pub workers: usize,

    /// HTTP transport; a crawl cannot start without one
    pub client: Option<Client>,

    /// Bytes of each response body handed to the href scan
    pub max_body_bytes: usize,
}

impl InstanceConfig {
    pub fn new(workers: usize, client: Client) -> Self {
        Self {
            workers,
            client: Some(client),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Builds the instance settings (and HTTP client) from `[crawler]` config
    pub fn from_crawler_config(config: &CrawlerConfig) -> Result<Self, SitewalkError> {
        validate_crawler_config(config)?;
        let client = build_http_client(config)?;
        Ok(Self {
            max_body_bytes: config.max_body_bytes,
            ..Self::new(config.workers, client)
        })
    }

    /// Default worker budget with a default 60 second client
    pub fn with_defaults() -> Result<Self, SitewalkError> {
        Self::from_crawler_config(&CrawlerConfig::default())
    }
}

/// Outcome of a settled crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Every URL admitted to the frontier, seed included
    pub links: Vec<String>,

    /// Per-link failures, in no particular order
    pub errors: Vec<CrawlError>,
}

/// State shared by the dispatch loop and every crawl task
struct Shared {
    seed: String,
    client: Client,
    max_body_bytes: usize,
    frontier: Frontier,
    errors: ErrorCollector,
    tracker: CompletionTracker,
    governor: Governor,
    queue: mpsc::Sender<String>,
}

impl Shared {
    /// Fetches one page and dispatches what it links to
    async fn crawl(&self, url: String) {
        // Declared first so it drops last: the balance settles only after the
        // slot is back and every admission below has been queued.
        let _finish = FinishGuard::new(&self.tracker);

        let Some(_slot) = self.governor.acquire().await else {
            tracing::debug!("Governor closed, skipping {}", url);
            return;
        };

        let body = match fetch_page(&self.client, &url, self.max_body_bytes).await {
            Ok(body) => body,
            Err(e) => {
                self.errors.record(e);
                return;
            }
        };

        let hrefs = extract_hrefs(&body);
        drop(body);
        tracing::trace!("{} references on {}", hrefs.len(), url);

        for href in hrefs {
            self.validate_and_dispatch(&href, &url).await;
        }
    }

    /// Applies the URL policy to one discovered reference
    async fn validate_and_dispatch(&self, link: &str, base: &str) {
        let link = link.trim();

        // Fragment-only references point back at the page they sit on.
        if link.is_empty() || link.starts_with('#') {
            return;
        }

        if !is_same_domain(link, base) {
            return;
        }

        let absolute = match resolve(link, base) {
            Ok(absolute) => absolute,
            Err(e) => {
                self.errors.record(CrawlError::resolution(link, base, e));
                return;
            }
        };

        if !is_http_scheme(&absolute) {
            return;
        }

        if is_same_domain(&absolute, &self.seed) {
            self.begin_processing(strip_fragment(&absolute)).await;
        }
    }

    /// Admits `url` if it is new and puts it on the work queue
    async fn begin_processing(&self, url: String) {
        if !self.frontier.try_admit(&url) {
            return;
        }

        // Counted before it is queued, so the balance cannot hit zero while
        // this URL is still waiting for a task.
        self.tracker.admit();
        tracing::debug!("Admitted {}", url);

        if let Err(e) = self.queue.send(url).await {
            tracing::warn!("Work queue closed, dropping {}", e.0);
            self.tracker.dispatched();
            self.tracker.finish();
        }
    }
}

fn strip_fragment(url: &str) -> String {
    match url.split_once('#') {
        Some((without, _)) => without.to_string(),
        None => url.to_string(),
    }
}

/// One crawl of one site
///
/// An instance runs once. Build a fresh one for every crawl.
///
/// # Example
///
/// ```no_run
/// use sitewalk::crawler::{CrawlInstance, InstanceConfig};
///
/// # async fn example() -> Result<(), sitewalk::SitewalkError> {
/// let mut instance = CrawlInstance::new("https://example.test/", InstanceConfig::with_defaults()?)?;
/// instance.run().await?;
/// println!("{} pages, {} errors", instance.links().len(), instance.errors().len());
/// # Ok(())
/// # }
/// ```
pub struct CrawlInstance {
    shared: Arc<Shared>,
    host: String,
    queue: Option<mpsc::Receiver<String>>,
}

impl CrawlInstance {
    /// Validates the settings and the seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlInstance)` - Ready to run
    /// * `Err(SitewalkError::Config)` - Worker budget is zero or no client is set
    /// * `Err(SitewalkError::InvalidHost)` - The seed is not an http(s) URL with a host
    pub fn new(initial_url: &str, config: InstanceConfig) -> Result<Self, SitewalkError> {
        if config.workers < 1 {
            return Err(ConfigError::Validation(format!(
                "workers must be >= 1, got {}",
                config.workers
            ))
            .into());
        }
        if config.max_body_bytes < 1 {
            return Err(ConfigError::Validation(format!(
                "max_body_bytes must be >= 1, got {}",
                config.max_body_bytes
            ))
            .into());
        }
        let client = config.client.ok_or(ConfigError::MissingClient)?;

        let invalid_host = || SitewalkError::InvalidHost {
            url: initial_url.to_string(),
        };
        if !is_http_scheme(initial_url) {
            return Err(invalid_host());
        }
        let host = hostname(initial_url).map_err(|_| invalid_host())?;
        let seed = resolve(initial_url, initial_url).map_err(|_| invalid_host())?;

        let (sender, receiver) = mpsc::channel(config.workers);

        Ok(Self {
            shared: Arc::new(Shared {
                seed: strip_fragment(&seed),
                client,
                max_body_bytes: config.max_body_bytes,
                frontier: Frontier::new(),
                errors: ErrorCollector::new(),
                tracker: CompletionTracker::new(),
                governor: Governor::new(config.workers),
                queue: sender,
            }),
            host,
            queue: Some(receiver),
        })
    }

    /// Crawls until every admitted URL has been processed
    ///
    /// Per-link failures are collected, never returned; the only error here
    /// is calling `run` a second time.
    pub async fn run(&mut self) -> Result<(), SitewalkError> {
        let mut queue = self.queue.take().ok_or(SitewalkError::AlreadyRun)?;
        let shared = Arc::clone(&self.shared);
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} with {} workers",
            shared.seed,
            shared.governor.capacity()
        );

        shared.begin_processing(shared.seed.clone()).await;

        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;
        let done = shared.tracker.wait();
        tokio::pin!(done);

        loop {
            tokio::select! {
                _ = &mut done => break,
                Some(url) = queue.recv() => {
                    shared.tracker.dispatched();
                    dispatched += 1;
                    tracing::debug!("Dispatching {}", url);

                    let task_shared = Arc::clone(&shared);
                    tasks.spawn(async move { task_shared.crawl(url).await });

                    if dispatched % PROGRESS_INTERVAL == 0 {
                        log_progress(&shared, dispatched, start_time);
                    }
                }
                Some(joined) = tasks.join_next() => reap(joined),
            }
        }

        // Every task has settled its balance by now; collect the handles.
        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }
        shared.governor.close();

        tracing::info!(
            "Crawl of {} complete: {} links, {} errors, peak {} of {} workers in {:?}",
            self.host,
            shared.frontier.len(),
            shared.errors.len(),
            shared.governor.peak(),
            shared.governor.capacity(),
            start_time.elapsed()
        );

        Ok(())
    }

    /// Hostname the crawl is confined to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Seed URL in canonical form
    pub fn seed(&self) -> &str {
        &self.shared.seed
    }

    pub fn state(&self) -> CrawlState {
        self.shared.tracker.state()
    }

    pub fn outstanding(&self) -> usize {
        self.shared.tracker.outstanding()
    }

    /// Most fetches that were ever in flight at the same time
    pub fn peak_workers(&self) -> usize {
        self.shared.governor.peak()
    }

    /// Every URL admitted to the frontier
    pub fn links(&self) -> Vec<String> {
        self.shared.frontier.snapshot()
    }

    pub fn errors(&self) -> Vec<CrawlError> {
        self.shared.errors.snapshot()
    }

    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            links: self.links(),
            errors: self.errors(),
        }
    }
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Crawl task failed: {}", e);
    }
}

fn log_progress(shared: &Shared, dispatched: usize, start_time: Instant) {
    let elapsed = start_time.elapsed().as_secs_f64();
    tracing::info!(
        "Progress: {} dispatched, {} outstanding, {}/{} workers busy, {:.2} pages/sec ({:?})",
        dispatched,
        shared.tracker.outstanding(),
        shared.governor.in_use(),
        shared.governor.capacity(),
        dispatched as f64 / elapsed.max(f64::EPSILON),
        shared.tracker.state()
    );
}
