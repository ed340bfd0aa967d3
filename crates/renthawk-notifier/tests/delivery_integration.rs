use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use renthawk_core::config::NotifierConfig;
use renthawk_core::listing::OfferingClass;
use renthawk_core::{Listing, Preferences, QueueStatus};
use renthawk_notifier::delivery::DeliveryWorker;
use renthawk_notifier::transport::{ChatTransport, InlineAction, TransportError};
use renthawk_store::DuckDbBackend;

struct RecordingTransport {
    sent: AtomicUsize,
    fail_as_blocked: bool,
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, _chat_id: i64, _text: &str, _buttons: &[InlineAction]) -> Result<(), TransportError> {
        if self.fail_as_blocked {
            return Err(TransportError::UserBlocked);
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_photo(
        &self,
        _chat_id: i64,
        _photo_url: &str,
        _caption: &str,
        _buttons: &[InlineAction],
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

fn config() -> NotifierConfig {
    NotifierConfig {
        db_path: ":memory:".to_string(),
        bot_token: "test-token".to_string(),
        admin_ids: Vec::new(),
        notification_interval_seconds: 30,
        max_notifications_per_user_per_day: 20,
        notification_batch_size: 20,
        notification_retry_attempts: 2,
    }
}

async fn seed_pending_entry(db: &DuckDbBackend, user_id: i64) -> i64 {
    db.upsert_user(user_id, Some("tester")).await.unwrap();
    db.set_user_active(user_id, true).await.unwrap();
    db.set_preferences(
        user_id,
        &Preferences {
            cities: vec!["AMSTERDAM".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut listing = Listing::new("pararius", "abc-1", "https://pararius.nl/abc-1");
    listing.title = Some("Sample Street 1".to_string());
    listing.address = "Sample Street 1".to_string();
    listing.city = "AMSTERDAM".to_string();
    listing.price_numeric = 1500;
    listing.offering_type = OfferingClass::Rental;
    db.upsert_listing(&listing).await.unwrap();
    let listing_id = db.get_listing_id("pararius", "abc-1").await.unwrap().unwrap();
    db.enqueue_matches(listing_id).await.unwrap();
    listing_id
}

#[tokio::test]
async fn successful_send_marks_entry_sent_and_records_history() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_pending_entry(&db, 42).await;

    let transport = Arc::new(RecordingTransport {
        sent: AtomicUsize::new(0),
        fail_as_blocked: false,
    });
    let worker = DeliveryWorker::new(db.clone(), transport.clone(), config());
    worker.run_once().await.unwrap();

    assert_eq!(transport.sent.load(Ordering::SeqCst), 1);

    let conn = db.conn_for_test().await;
    let status: String = conn
        .prepare("SELECT status FROM notification_queue WHERE user_id = 42")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert_eq!(status, QueueStatus::Sent.as_str());

    let history_count: i64 = conn
        .prepare("SELECT COUNT(*) FROM notification_history WHERE user_id = 42")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert_eq!(history_count, 1);
}

#[tokio::test]
async fn blocked_user_is_deactivated_and_entry_marked_failed() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_pending_entry(&db, 7).await;

    let transport = Arc::new(RecordingTransport {
        sent: AtomicUsize::new(0),
        fail_as_blocked: true,
    });
    let worker = DeliveryWorker::new(db.clone(), transport, config());
    worker.run_once().await.unwrap();

    let conn = db.conn_for_test().await;
    let status: String = conn
        .prepare("SELECT status FROM notification_queue WHERE user_id = 7")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert_eq!(status, QueueStatus::Failed.as_str());

    let active: bool = conn
        .prepare("SELECT active FROM telegram_users WHERE user_id = 7")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert!(!active, "a user who blocked the bot must be deactivated");
}

#[tokio::test]
async fn daily_cap_rate_limits_instead_of_sending() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    seed_pending_entry(&db, 99).await;

    for _ in 0..20 {
        db.record_notification_sent(99, 1).await.unwrap();
    }

    let transport = Arc::new(RecordingTransport {
        sent: AtomicUsize::new(0),
        fail_as_blocked: false,
    });
    let worker = DeliveryWorker::new(db.clone(), transport.clone(), config());
    worker.run_once().await.unwrap();

    assert_eq!(transport.sent.load(Ordering::SeqCst), 0, "over-cap user must not be sent to");

    let conn = db.conn_for_test().await;
    let status: String = conn
        .prepare("SELECT status FROM notification_queue WHERE user_id = 99")
        .unwrap()
        .query_row([], |row| row.get(0))
        .unwrap();
    assert_eq!(status, QueueStatus::RateLimited.as_str());
}
