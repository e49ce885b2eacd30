//! End-to-end crawls against mock sites

use crate::{instance_config, mount_page, page, sorted};
use sitewalk::crawler::{crawl, CrawlState};
use sitewalk::{CrawlError, CrawlInstance, InstanceConfig};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_follows_relative_links_and_skips_foreign() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        page(&[
            "/b",
            "https://other.test/x",
            "mailto:someone@example.test",
            "javascript:void(0)",
        ]),
    )
    .await;
    mount_page(&server, "/b", page(&[])).await;

    let report = crawl(&format!("{}/a", base), instance_config(4)).await.unwrap();

    assert_eq!(
        sorted(report.links),
        vec![format!("{}/a", base), format!("{}/b", base)]
    );
    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
}

#[tokio::test]
async fn test_failing_seed_yields_one_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let report = crawl(&seed, instance_config(4)).await.unwrap();

    assert_eq!(report.links, vec![seed.clone()]);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_fetch());
    assert_eq!(report.errors[0].url(), seed);
}

#[tokio::test]
async fn test_cycle_fetches_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    let absolute_b = format!("{}/b", base);
    mount_page(&server, "/", page(&["/b", "/", absolute_b.as_str()])).await;
    mount_page(&server, "/b", page(&["/", "/b", "./b"])).await;

    let mut instance = CrawlInstance::new(&format!("{}/", base), instance_config(8)).unwrap();
    instance.run().await.unwrap();

    assert_eq!(instance.state(), CrawlState::Done);
    assert_eq!(instance.outstanding(), 0);
    assert_eq!(
        sorted(instance.links()),
        vec![format!("{}/", base), format!("{}/b", base)]
    );
    assert!(instance.errors().is_empty());
}

#[tokio::test]
async fn test_single_worker_covers_closed_graph() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = 20;

    mount_page(&server, "/", page(&["/p0"])).await;
    for n in 0..pages {
        let next = format!("/p{}", n + 1);
        let after = format!("/p{}", n + 2);
        let mut hrefs = vec!["/"];
        if n + 1 < pages {
            hrefs.push(next.as_str());
        }
        if n + 2 < pages {
            hrefs.push(after.as_str());
        }
        mount_page(&server, &format!("/p{}", n), page(&hrefs)).await;
    }

    let report = crawl(&format!("{}/", base), instance_config(1)).await.unwrap();

    let mut expected: Vec<String> = (0..pages).map(|n| format!("{}/p{}", base, n)).collect();
    expected.push(format!("{}/", base));
    assert_eq!(sorted(report.links), sorted(expected));
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_wide_fan_out_is_fetched_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let children: Vec<String> = (0..50).map(|n| format!("/c{}", n)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();

    mount_page(&server, "/", page(&hrefs)).await;
    for child in &children {
        // Every child links to every sibling, so each URL is discovered many times.
        mount_page(&server, child, page(&hrefs)).await;
    }

    let report = crawl(&format!("{}/", base), instance_config(16)).await.unwrap();

    assert_eq!(report.links.len(), children.len() + 1);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_malformed_reference_recorded_as_resolution_error() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    mount_page(&server, "/", page(&[":xyz", "/ok"])).await;
    mount_page(&server, "/ok", page(&[])).await;

    let report = crawl(&seed, instance_config(4)).await.unwrap();

    assert_eq!(sorted(report.links), vec![seed.clone(), format!("{}/ok", base)]);
    assert_eq!(report.errors.len(), 1);
    match &report.errors[0] {
        CrawlError::Resolution { url, base, .. } => {
            assert_eq!(url, ":xyz");
            assert_eq!(base, &seed);
        }
        other => panic!("expected a resolution error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fragments_do_not_create_new_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["#top", "", "/b#section", "/b", "/b#other"])).await;
    mount_page(&server, "/b", page(&["#", "/#intro"])).await;

    let report = crawl(&format!("{}/#start", base), instance_config(4))
        .await
        .unwrap();

    assert_eq!(
        sorted(report.links),
        vec![format!("{}/", base), format!("{}/b", base)]
    );
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_broken_link_is_visited_and_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/missing", "/ok"])).await;
    mount_page(&server, "/ok", page(&[])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&format!("{}/", base), instance_config(4)).await.unwrap();

    assert_eq!(report.links.len(), 3);
    assert!(report.links.contains(&format!("{}/missing", base)));
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_fetch());
    assert_eq!(report.errors[0].url(), format!("{}/missing", base));
}

#[tokio::test]
async fn test_absolute_same_host_links_are_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    let absolute = format!("{}/abs", base);
    mount_page(&server, "/", page(&[absolute.as_str()])).await;
    mount_page(&server, "/abs", page(&["rel"])).await;
    mount_page(&server, "/rel", page(&[])).await;

    let report = crawl(&format!("{}/", base), instance_config(2)).await.unwrap();

    assert_eq!(
        sorted(report.links),
        vec![
            format!("{}/", base),
            format!("{}/abs", base),
            format!("{}/rel", base)
        ]
    );
}

#[tokio::test]
async fn test_fetches_never_exceed_worker_budget() {
    let server = MockServer::start().await;
    let base = server.uri();
    let delay = Duration::from_millis(200);
    let children: Vec<String> = (0..6).map(|n| format!("/slow{}", n)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();

    for (route, body) in std::iter::once(("/", page(&hrefs)))
        .chain(children.iter().map(|child| (child.as_str(), page(&[]))))
    {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body)
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut instance = CrawlInstance::new(&format!("{}/", base), instance_config(2)).unwrap();
    let started = Instant::now();
    instance.run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(instance.links().len(), children.len() + 1);
    assert!(instance.errors().is_empty());
    assert_eq!(instance.peak_workers(), 2);
    // Seed, then six slow pages two at a time: at least four delays back to back.
    assert!(
        elapsed >= delay * 4 - Duration::from_millis(50),
        "crawl finished in {:?}, faster than two workers allow",
        elapsed
    );
}

#[tokio::test]
async fn test_oversized_page_is_scanned_up_to_the_cap() {
    let server = MockServer::start().await;
    let base = server.uri();

    let mut body = page(&["/early"]);
    body.push_str(&"<p>filler</p>".repeat(1000));
    body.push_str(r#"<a href="/late">late</a>"#);
    mount_page(&server, "/", body).await;
    mount_page(&server, "/early", page(&[])).await;

    let config = InstanceConfig {
        max_body_bytes: 2048,
        ..instance_config(2)
    };
    let report = crawl(&format!("{}/", base), config).await.unwrap();

    assert_eq!(
        sorted(report.links),
        vec![format!("{}/", base), format!("{}/early", base)]
    );
    assert!(report.errors.is_empty());
}
