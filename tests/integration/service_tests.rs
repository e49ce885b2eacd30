//! Service-level tests: persistence, the freshness cache and reports

use crate::{mount_page, page, test_crawler_config};
use sitewalk::config::CacheConfig;
use sitewalk::output::write_report;
use sitewalk::{CrawlRecord, CrawlStore, CrawlerService, SitewalkError, SqliteStore};
use tempfile::TempDir;
use wiremock::MockServer;

fn sqlite_service(dir: &TempDir) -> CrawlerService<SqliteStore> {
    let store = SqliteStore::new(&dir.path().join("sitewalk.db")).unwrap();
    CrawlerService::with_settings(store, test_crawler_config(4), &CacheConfig::default())
}

#[tokio::test]
async fn test_second_crawl_of_host_is_served_from_store() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/", page(&["/about"])).await;
    mount_page(&server, "/about", page(&["/"])).await;

    let dir = TempDir::new().unwrap();
    let mut service = sqlite_service(&dir);

    let first = service.crawl_site(&format!("{}/", base)).await.unwrap();
    assert_eq!(first.links.len(), 2);

    // Same host, different page; the mocks above would fail on a second fetch.
    let second = service.crawl_site(&format!("{}/about", base)).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(service.crawl_history().unwrap().len(), 1);
}

#[tokio::test]
async fn test_records_survive_reopening_the_database() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(&[])).await;

    let dir = TempDir::new().unwrap();
    let record = {
        let mut service = sqlite_service(&dir);
        service.crawl_site(&format!("{}/", server.uri())).await.unwrap()
    };

    let service = sqlite_service(&dir);
    assert_eq!(service.get_crawl(&record.id).unwrap(), record);
    assert!(matches!(
        service.get_crawl("6f1c2a4e-0000-4000-8000-000000000000"),
        Err(SitewalkError::RecordNotFound { .. })
    ));
}

#[tokio::test]
async fn test_failed_seed_is_still_saved() {
    let dir = TempDir::new().unwrap();
    let mut service = sqlite_service(&dir);

    // Nothing listens on port 1.
    let record = service.crawl_site("http://127.0.0.1:1/").await.unwrap();
    assert_eq!(record.links, vec!["http://127.0.0.1:1/".to_string()]);
    assert_eq!(record.errors.len(), 1);
    assert!(record.errors[0].is_fetch());
    assert_eq!(service.store().by_host("127.0.0.1").unwrap().len(), 1);
}

#[tokio::test]
async fn test_report_contains_crawled_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page(&["/x"])).await;
    mount_page(&server, "/x", page(&[])).await;

    let dir = TempDir::new().unwrap();
    let mut service = sqlite_service(&dir);
    let record = service.crawl_site(&format!("{}/", server.uri())).await.unwrap();

    let report_path = dir.path().join("report.json");
    write_report(&service.crawl_history().unwrap(), &report_path).unwrap();

    let parsed: Vec<CrawlRecord> =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(parsed, vec![record]);
}
