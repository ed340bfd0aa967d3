use renthawk_core::{Listing, Preferences};
use renthawk_store::DuckDbBackend;

async fn seed_user(db: &DuckDbBackend, user_id: i64, prefs: Preferences) {
    db.upsert_user(user_id, Some("tester")).await.unwrap();
    db.set_preferences(user_id, &prefs).await.unwrap();
}

async fn seed_listing(db: &DuckDbBackend, city: &str, price: i64) -> i64 {
    let mut listing = Listing::new("x", city, format!("https://x/{city}"));
    listing.address = "Main 1".to_string();
    listing.city = city.to_string();
    listing.price_numeric = price;
    db.upsert_listing(&listing).await.unwrap();
    db.get_listing_id("x", city).await.unwrap().unwrap()
}

#[tokio::test]
async fn match_fan_out_enqueues_only_for_matching_city_and_price() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_user(
        &db,
        1,
        Preferences {
            cities: vec!["UTRECHT".into()],
            max_price: 2000,
            ..Default::default()
        },
    )
    .await;

    let matching_id = seed_listing(&db, "UTRECHT", 1500).await;
    let non_matching_id = seed_listing(&db, "DEN HAAG", 1500).await;

    let inserted_match = db.enqueue_matches(matching_id).await.unwrap();
    let inserted_non_match = db.enqueue_matches(non_matching_id).await.unwrap();

    assert_eq!(inserted_match, 1);
    assert_eq!(inserted_non_match, 0);
}

#[tokio::test]
async fn enqueue_matches_is_idempotent() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_user(
        &db,
        1,
        Preferences {
            cities: vec!["UTRECHT".into()],
            ..Default::default()
        },
    )
    .await;
    let listing_id = seed_listing(&db, "UTRECHT", 1000).await;

    let first = db.enqueue_matches(listing_id).await.unwrap();
    let second = db.enqueue_matches(listing_id).await.unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
}

#[tokio::test]
async fn empty_cities_never_produces_queue_entries() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_user(&db, 1, Preferences::default()).await;
    let listing_id = seed_listing(&db, "UTRECHT", 1000).await;

    let inserted = db.enqueue_matches(listing_id).await.unwrap();
    assert_eq!(inserted, 0);
}

#[tokio::test]
async fn zero_bounds_mean_no_upper_bound() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_user(
        &db,
        1,
        Preferences {
            cities: vec!["UTRECHT".into()],
            max_price: 0,
            max_rooms: 0,
            max_area: 0,
            ..Default::default()
        },
    )
    .await;
    let listing_id = seed_listing(&db, "UTRECHT", 50_000).await;

    let inserted = db.enqueue_matches(listing_id).await.unwrap();
    assert_eq!(inserted, 1);
}
