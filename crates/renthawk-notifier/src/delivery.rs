use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use renthawk_core::config::NotifierConfig;
use renthawk_core::{Listing, QueueEntry, QueueStatus};
use renthawk_store::DuckDbBackend;
use tracing::{info, warn};

use crate::transport::{ChatTransport, InlineAction, TransportError};

const INTER_SEND_DELAY: Duration = Duration::from_millis(100);
const TRANSIENT_RETRY_DELAY: Duration = Duration::from_secs(1);
const GC_RETENTION_DAYS: i64 = 30;
const GC_PROBABILITY_PERCENT: u8 = 10;

pub struct DeliveryWorker {
    store: DuckDbBackend,
    transport: Arc<dyn ChatTransport>,
    config: NotifierConfig,
}

impl DeliveryWorker {
    pub fn new(store: DuckDbBackend, transport: Arc<dyn ChatTransport>, config: NotifierConfig) -> Self {
        Self { store, transport, config }
    }

    /// Run the continuous delivery loop until `stop` resolves.
    pub async fn run(&self, mut stop: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        loop {
            if let Err(err) = self.run_once().await {
                warn!(error = %err, "delivery pass failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.notification_interval()) => {}
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!("delivery worker received stop signal, exiting");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One batch: pick pending entries, send each, then an occasional GC pass.
    pub async fn run_once(&self) -> anyhow::Result<()> {
        let entries = self.store.pick_pending(self.config.notification_batch_size).await?;
        for entry in entries {
            self.process_entry(&entry).await;
            tokio::time::sleep(INTER_SEND_DELAY).await;
        }

        if rand::thread_rng().gen_range(0..100) < GC_PROBABILITY_PERCENT {
            let removed = self.store.gc_old_notifications(GC_RETENTION_DAYS).await?;
            info!(removed, "garbage-collected old notification rows");
        }

        Ok(())
    }

    async fn process_entry(&self, entry: &QueueEntry) {
        let daily_sent = match self.store.daily_sent_count(entry.user_id).await {
            Ok(count) => count,
            Err(err) => {
                warn!(user_id = entry.user_id, error = %err, "failed to read daily send count");
                return;
            }
        };
        if daily_sent >= self.config.max_notifications_per_user_per_day {
            if let Err(err) = self.store.set_queue_status(entry.id, QueueStatus::RateLimited, false).await {
                warn!(entry_id = entry.id, error = %err, "failed to mark entry rate_limited");
            }
            return;
        }

        if let Err(err) = self.store.set_queue_status(entry.id, QueueStatus::Processing, true).await {
            warn!(entry_id = entry.id, error = %err, "failed to mark entry processing");
            return;
        }

        let listing = match self.store.get_listing(entry.listing_id).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                warn!(entry_id = entry.id, listing_id = entry.listing_id, "listing vanished before send");
                let _ = self.store.set_queue_status(entry.id, QueueStatus::Failed, false).await;
                return;
            }
            Err(err) => {
                warn!(entry_id = entry.id, error = %err, "failed to load listing for delivery");
                return;
            }
        };

        let (text, image_url, buttons) = build_message(&listing);
        let outcome = self.send_with_retries(entry.user_id, &text, image_url.as_deref(), &buttons).await;

        match outcome {
            Ok(()) => {
                if let Err(err) = self.store.set_queue_status(entry.id, QueueStatus::Sent, false).await {
                    warn!(entry_id = entry.id, error = %err, "failed to mark entry sent");
                }
                if let Err(err) = self.store.record_notification_sent(entry.user_id, entry.listing_id).await {
                    warn!(entry_id = entry.id, error = %err, "failed to record notification history");
                }
            }
            Err(TransportError::UserBlocked) => {
                if let Err(err) = self.store.set_user_active(entry.user_id, false).await {
                    warn!(user_id = entry.user_id, error = %err, "failed to deactivate blocked user");
                }
                let _ = self.store.set_queue_status(entry.id, QueueStatus::Failed, false).await;
            }
            Err(_) => {
                let _ = self.store.set_queue_status(entry.id, QueueStatus::Failed, false).await;
            }
        }
    }

    async fn send_with_retries(
        &self,
        chat_id: i64,
        text: &str,
        image_url: Option<&str>,
        buttons: &[InlineAction],
    ) -> Result<(), TransportError> {
        let attempts = self.config.notification_retry_attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            let sent = match image_url {
                Some(photo_url) => self.transport.send_photo(chat_id, photo_url, text, buttons).await,
                None => self.transport.send_text(chat_id, text, buttons).await,
            };
            match sent {
                Ok(()) => return Ok(()),
                Err(TransportError::UserBlocked) => return Err(TransportError::UserBlocked),
                Err(TransportError::BadRequest(reason)) => return Err(TransportError::BadRequest(reason)),
                Err(TransportError::Transient(reason)) => {
                    warn!(chat_id, attempt, reason = %reason, "transient delivery error, retrying");
                    last_err = Some(TransportError::Transient(reason));
                    if attempt < attempts {
                        tokio::time::sleep(TRANSIENT_RETRY_DELAY).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| TransportError::Transient("retries exhausted".to_string())))
    }
}

fn build_message(listing: &Listing) -> (String, Option<String>, Vec<InlineAction>) {
    let title = listing.title.as_deref().unwrap_or(&listing.address);
    let price = listing
        .price_text
        .clone()
        .unwrap_or_else(|| format!("€ {}", listing.price_numeric));
    let rooms = listing.rooms.map(|r| format!("{r} rooms")).unwrap_or_default();
    let area = listing.living_area.map(|a| format!("{a} m²")).unwrap_or_default();

    let mut text = format!("<b>{title}</b>\n{}, {}\n{price}", listing.address, listing.city);
    if !rooms.is_empty() || !area.is_empty() {
        text.push('\n');
        text.push_str(&[rooms, area].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" · "));
    }

    let mut buttons = vec![InlineAction::Link {
        label: "Open listing".to_string(),
        url: listing.url.clone(),
    }];
    buttons.push(InlineAction::Copy {
        label: "Copy address".to_string(),
        text: listing.address.clone(),
    });

    let image_url = listing.images.first().cloned();

    (text, image_url, buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use renthawk_core::listing::OfferingClass;

    fn sample_listing() -> Listing {
        let mut l = Listing::new("pararius", "abc-1", "https://pararius.nl/abc-1");
        l.title = Some("Sample Street 1".to_string());
        l.address = "Sample Street 1".to_string();
        l.city = "AMSTERDAM".to_string();
        l.price_text = Some("€ 1.500 per month".to_string());
        l.price_numeric = 1500;
        l.rooms = Some(3);
        l.living_area = Some(75);
        l.offering_type = OfferingClass::Rental;
        l
    }

    #[test]
    fn message_includes_title_price_and_location() {
        let (text, image_url, buttons) = build_message(&sample_listing());
        assert!(text.contains("Sample Street 1"));
        assert!(text.contains("AMSTERDAM"));
        assert!(text.contains("€ 1.500 per month"));
        assert!(text.contains("3 rooms"));
        assert!(text.contains("75 m²"));
        assert_eq!(buttons.len(), 2);
        assert!(image_url.is_none());
    }

    #[test]
    fn message_omits_room_and_area_line_when_both_missing() {
        let mut listing = sample_listing();
        listing.rooms = None;
        listing.living_area = None;
        let (text, _, _) = build_message(&listing);
        assert!(!text.contains("rooms"));
        assert!(!text.contains("m²"));
    }

    #[test]
    fn message_surfaces_first_image_when_present() {
        let mut listing = sample_listing();
        listing.images = vec!["https://img.example/1.jpg".to_string(), "https://img.example/2.jpg".to_string()];
        let (_, image_url, _) = build_message(&listing);
        assert_eq!(image_url.as_deref(), Some("https://img.example/1.jpg"));
    }
}
