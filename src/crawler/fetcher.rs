//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client from crawler configuration
//! - One bounded-timeout GET per page, no retries
//! - Reading at most a configured number of body bytes
//! - Turning transport and status failures into [`CrawlError::Fetch`]

use crate::config::CrawlerConfig;
use crate::CrawlError;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (timeout and user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitewalk::config::CrawlerConfig;
/// use sitewalk::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with a single GET request
///
/// Non-2xx statuses count as failures. A body that cannot be read is
/// reported the same way as a transport failure.
///
/// The body is read chunk by chunk and at most `max_body_bytes` are kept;
/// past the cap the connection is dropped and the prefix returned. Responses
/// declaring a non-markup `Content-Type` (images, archives, video) yield an
/// empty body without being read.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The absolute URL to fetch
/// * `max_body_bytes` - Upper bound on the bytes returned
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The (possibly truncated) response body
/// * `Err(CrawlError::Fetch)` - The page could not be fetched
pub async fn fetch_page(
    client: &Client,
    url: &str,
    max_body_bytes: usize,
) -> Result<Vec<u8>, CrawlError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| CrawlError::fetch(url, e))?;

    if !is_markup(response.headers()) {
        tracing::debug!("Skipping body of {}: not markup", url);
        return Ok(Vec::new());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| CrawlError::fetch(url, e))?
    {
        let room = max_body_bytes.saturating_sub(body.len());
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            tracing::debug!("Body of {} truncated at {} bytes", url, max_body_bytes);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// True unless the response declares a media type with no links to offer
///
/// A missing or unparseable header is given the benefit of the doubt.
fn is_markup(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return true;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.is_empty()
        || essence.starts_with("text/")
        || essence.contains("html")
        || essence.contains("xml")
}
