use renthawk_core::config::ScraperConfig;
use renthawk_scraper::fetcher::Fetcher;
use renthawk_scraper::scheduler::Scheduler;
use renthawk_store::DuckDbBackend;
use std::time::Duration;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pararius_card(href: &str) -> String {
    format!(
        r#"<div class="listing-search-item">
            <a class="listing-search-item__link--title" href="{href}">Sample Street 1</a>
            <div class="listing-search-item__sub-title">1012 AB Amsterdam</div>
            <div class="listing-search-item__price">€ 1.200 per month</div>
        </div>"#
    )
}

fn config_for(db_path: &str) -> ScraperConfig {
    ScraperConfig {
        db_path: db_path.to_string(),
        scan_interval_seconds: 60,
        http_timeout_seconds: 5,
        max_concurrent_requests: 4,
        use_proxies: false,
        proxy_list: Vec::new(),
        proxy_rotation: renthawk_core::config::ProxyRotation::RoundRobin,
    }
}

#[tokio::test]
async fn pagination_stop_skips_remaining_query_urls_of_the_same_source() {
    let server = MockServer::start().await;

    Mock::given(path("/apartments/amsterdam/page-9"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/apartments/amsterdam/page-1"))
        .mount(&server)
        .await;
    Mock::given(path("/apartments/amsterdam/page-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pararius_card("/huis/amsterdam/abc-1")))
        .mount(&server)
        .await;
    Mock::given(path("/apartments/amsterdam/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pararius_card("/huis/amsterdam/should-not-be-fetched")))
        .mount(&server)
        .await;

    let db = DuckDbBackend::open_in_memory().unwrap();
    db.add_query_url("pararius", &format!("{}/apartments/amsterdam/page-9", server.uri()), None)
        .await
        .unwrap();
    db.add_query_url("pararius", &format!("{}/apartments/amsterdam/page-2", server.uri()), None)
        .await
        .unwrap();

    let fetcher = Fetcher::new(Duration::from_secs(5), 4).unwrap();
    let scheduler = Scheduler::new(db.clone(), fetcher, config_for(":memory:"), vec!["Amsterdam".to_string()]);

    scheduler.run_cycle().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let hit_page_2 = requests.iter().any(|r| r.url.path() == "/apartments/amsterdam/page-2");
    assert!(!hit_page_2, "pagination stop must skip subsequent query urls of the same source");

    let listing_id = db.get_listing_id("pararius", "abc-1").await.unwrap();
    assert!(listing_id.is_some());
}

#[tokio::test]
async fn adapter_failure_does_not_stop_other_sources_in_the_same_cycle() {
    let server = MockServer::start().await;

    Mock::given(path("/funda/unreachable"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;
    Mock::given(path("/pararius/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pararius_card("/huis/amsterdam/ok-listing")))
        .mount(&server)
        .await;

    let db = DuckDbBackend::open_in_memory().unwrap();
    db.add_query_url("funda", &format!("{}/funda/unreachable", server.uri()), None)
        .await
        .unwrap();
    db.add_query_url("pararius", &format!("{}/pararius/ok", server.uri()), None)
        .await
        .unwrap();

    let fetcher = Fetcher::new(Duration::from_millis(200), 4).unwrap();
    let scheduler = Scheduler::new(db.clone(), fetcher, config_for(":memory:"), Vec::new());

    scheduler.run_cycle().await.unwrap();

    let pararius_listing = db.get_listing_id("pararius", "ok-listing").await.unwrap();
    assert!(pararius_listing.is_some(), "pararius must still be scanned after funda times out");

    let conn = db.conn_for_test().await;
    let (new_count, total_count): (i32, i32) = conn
        .prepare("SELECT new_count, total_count FROM scan_history WHERE source = 'funda'")
        .unwrap()
        .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap();
    assert_eq!(new_count, 0);
    assert_eq!(total_count, 0);
}
