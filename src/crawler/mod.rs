//! Crawler module: the crawl engine
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - Anchor `href` extraction from HTML
//! - The frontier (exactly-once admission) and error collection
//! - Bounded fetch concurrency and completion detection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod governor;
mod parser;
mod tracker;

pub use coordinator::{CrawlInstance, CrawlReport, InstanceConfig};
pub use fetcher::{build_http_client, fetch_page};
pub use frontier::{ErrorCollector, Frontier};
pub use governor::{Governor, WorkerSlot};
pub use parser::extract_hrefs;
pub use tracker::{CompletionTracker, CrawlState};

use crate::SitewalkError;

/// Runs a complete crawl of one site
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Validate the settings and the seed URL
/// 2. Follow every same-host link reachable from the seed
/// 3. Return the visited links and the per-link errors
///
/// # Arguments
///
/// * `initial_url` - The seed URL
/// * `config` - Worker budget and HTTP client
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (possibly with per-link errors)
/// * `Err(SitewalkError)` - The crawl could not start
pub async fn crawl(initial_url: &str, config: InstanceConfig) -> Result<CrawlReport, SitewalkError> {
    let mut instance = CrawlInstance::new(initial_url, config)?;
    instance.run().await?;
    Ok(instance.report())
}
