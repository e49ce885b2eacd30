//! Integration tests for Sitewalk
//!
//! These tests use wiremock to serve small closed link graphs and run the
//! full crawl cycle end-to-end against them.

mod crawl_tests;
mod service_tests;

use sitewalk::config::{CrawlerConfig, DEFAULT_MAX_BODY_BYTES};
use sitewalk::InstanceConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a minimal HTML page containing one anchor per href
pub fn page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

/// Serves `body` at `route`, requiring exactly one GET
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

pub fn test_crawler_config(workers: usize) -> CrawlerConfig {
    CrawlerConfig {
        workers,
        request_timeout_secs: 5,
        user_agent: "sitewalk-test".to_string(),
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
    }
}

pub fn instance_config(workers: usize) -> InstanceConfig {
    InstanceConfig::from_crawler_config(&test_crawler_config(workers))
        .expect("Failed to build HTTP client")
}

pub fn sorted(mut links: Vec<String>) -> Vec<String> {
    links.sort();
    links
}
