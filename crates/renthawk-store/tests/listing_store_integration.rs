use renthawk_core::Listing;
use renthawk_store::DuckDbBackend;

fn sample_listing(source: &str, source_id: &str, city: &str, price: i64) -> Listing {
    let mut l = Listing::new(source, source_id, format!("https://{source}/{source_id}"));
    l.address = "Main St 1".to_string();
    l.city = city.to_string();
    l.price_numeric = price;
    l
}

#[tokio::test]
async fn upsert_idempotence() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    let listing = sample_listing("x", "1", "AMSTERDAM", 1000);

    let first = db.upsert_listing(&listing).await.unwrap();
    let second = db.upsert_listing(&listing).await.unwrap();

    assert!(first);
    assert!(!second);

    let id = db.get_listing_id("x", "1").await.unwrap().unwrap();
    let stored = db.get_listing(id).await.unwrap().unwrap();
    assert_eq!(stored.price_numeric, 1000);
}

#[tokio::test]
async fn upsert_updates_price_on_rescrape_without_duplicating_the_row() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    let mut listing = sample_listing("x", "1", "AMSTERDAM", 1000);
    db.upsert_listing(&listing).await.unwrap();

    listing.price_numeric = 1250;
    let is_new = db.upsert_listing(&listing).await.unwrap();
    assert!(!is_new);

    let id = db.get_listing_id("x", "1").await.unwrap().unwrap();
    let stored = db.get_listing(id).await.unwrap().unwrap();
    assert_eq!(stored.price_numeric, 1250);
}

#[tokio::test]
async fn cross_source_duplicate_detection() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    db.seed_listing_for_duplicate_test("a", "1", "Main 1", "H1", "AMSTERDAM")
        .await
        .unwrap();
    db.seed_listing_for_duplicate_test("b", "2", "Main 1A", "H2", "AMSTERDAM")
        .await
        .unwrap();

    let pairs = db.find_duplicates(0.8).await.unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].source_a, "a");
    assert_eq!(pairs[0].source_b, "b");
    assert_ne!(pairs[0].source_a, pairs[0].source_b);
}

#[tokio::test]
async fn seeding_the_same_property_hash_twice_merges_into_one_row() {
    // property_hash is globally UNIQUE, so a second row sharing a hash with
    // an existing one folds into it rather than creating a duplicate —
    // cross-source duplicates are only ever found by address similarity
    // between rows that hold genuinely distinct hashes.
    let db = DuckDbBackend::open_in_memory().unwrap();
    let first_id = db
        .seed_listing_for_duplicate_test("a", "1", "Main 1", "H", "AMSTERDAM")
        .await
        .unwrap();
    let second_id = db
        .seed_listing_for_duplicate_test("a", "2", "Main 1", "H", "AMSTERDAM")
        .await
        .unwrap();

    assert_eq!(first_id, second_id);

    let pairs = db.find_duplicates(0.8).await.unwrap();
    assert!(pairs.is_empty());
}

#[tokio::test]
async fn scan_history_overwrites_on_rescan() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    db.update_scan_history("pararius", "AMSTERDAM", "https://pararius/1", 5, 10, 120)
        .await
        .unwrap();
    db.update_scan_history("pararius", "AMSTERDAM", "https://pararius/2", 0, 10, 90)
        .await
        .unwrap();

    let conn = db.conn_for_test().await;
    let count: i64 = conn
        .prepare("SELECT COUNT(*) FROM scan_history WHERE source = 'pararius' AND city = 'AMSTERDAM'")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
