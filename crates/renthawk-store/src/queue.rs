use anyhow::Result;
use renthawk_core::{QueueEntry, QueueStatus};

use crate::backend::DuckDbBackend;

impl DuckDbBackend {
    /// Expand one new listing into queue entries, one per matching active
    /// user, via a single cross-join insert. Idempotent:
    /// `ON CONFLICT (user_id, listing_id) DO NOTHING` means a repeated call
    /// adds no rows.
    pub async fn enqueue_matches(&self, listing_id: i64) -> Result<u64> {
        let conn = self.conn.lock().await;
        let inserted = conn.execute(
            r#"INSERT INTO notification_queue (user_id, listing_id, status)
               SELECT u.user_id, p.id, 'pending'
               FROM properties p
               JOIN user_preferences up
               JOIN telegram_users u ON u.user_id = up.user_id
               WHERE p.id = ?1
                 AND u.active = 1
                 AND u.notifications_enabled = 1
                 AND json_array_length(up.cities) > 0
                 AND EXISTS (
                     SELECT 1 FROM json_each(up.cities) c WHERE upper(c.value) = upper(p.city)
                 )
                 AND p.price_numeric >= up.min_price
                 AND (up.max_price = 0 OR p.price_numeric <= up.max_price)
                 AND (p.rooms IS NOT NULL OR up.min_rooms = 0)
                 AND (p.rooms IS NULL OR p.rooms >= up.min_rooms)
                 AND (p.rooms IS NULL OR up.max_rooms = 0 OR p.rooms <= up.max_rooms)
                 AND (p.living_area IS NOT NULL OR up.min_area = 0)
                 AND (p.living_area IS NULL OR p.living_area >= up.min_area)
                 AND (p.living_area IS NULL OR up.max_area = 0 OR p.living_area <= up.max_area)
                 AND (
                     json_array_length(up.classes) = 0
                     OR EXISTS (SELECT 1 FROM json_each(up.classes) c WHERE c.value = p.property_type)
                 )
                 AND (up.neighborhood IS NULL OR up.neighborhood = '' OR p.neighborhood LIKE '%' || up.neighborhood || '%')
               ON CONFLICT (user_id, listing_id) DO NOTHING"#,
            rusqlite::params![listing_id],
        )?;
        Ok(inserted as u64)
    }

    /// Up to `batch_size` pending entries, FIFO by `created_at`, joined
    /// against the active+enabled user set.
    pub async fn pick_pending(&self, batch_size: u32) -> Result<Vec<QueueEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"SELECT q.id, q.user_id, q.listing_id, q.status, q.attempts,
                      CAST(q.created_at AS VARCHAR), CAST(q.last_attempt_at AS VARCHAR)
               FROM notification_queue q
               JOIN telegram_users u ON u.user_id = q.user_id
               WHERE q.status = 'pending' AND u.active = true AND u.notifications_enabled = true
               ORDER BY q.created_at
               LIMIT ?1"#,
        )?;
        let rows = stmt
            .query_map(rusqlite::params![batch_size], |row| {
                let status: String = row.get(3)?;
                Ok(QueueEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    listing_id: row.get(2)?,
                    status: QueueStatus::parse(&status).unwrap_or(QueueStatus::Pending),
                    attempts: row.get(4)?,
                    created_at: chrono::Utc::now(),
                    last_attempt_at: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub async fn set_queue_status(&self, id: i64, status: QueueStatus, bump_attempts: bool) -> Result<()> {
        let conn = self.conn.lock().await;
        if bump_attempts {
            conn.execute(
                "UPDATE notification_queue SET status = ?1, attempts = attempts + 1, last_attempt_at = CURRENT_TIMESTAMP WHERE id = ?2",
                rusqlite::params![status.as_str(), id],
            )?;
        } else {
            conn.execute(
                "UPDATE notification_queue SET status = ?1 WHERE id = ?2",
                rusqlite::params![status.as_str(), id],
            )?;
        }
        Ok(())
    }

    /// Count of successful sends to `user_id` within the last 24 hours,
    /// the basis for the daily cap.
    pub async fn daily_sent_count(&self, user_id: i64) -> Result<u32> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare(
                "SELECT COUNT(*) FROM notification_history WHERE user_id = ?1 AND sent_at > datetime('now', '-24 hours')",
            )?
            .query_row(rusqlite::params![user_id], |row| row.get(0))?;
        Ok(count as u32)
    }

    pub async fn record_notification_sent(&self, user_id: i64, listing_id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO notification_history (user_id, listing_id) VALUES (?1, ?2)",
            rusqlite::params![user_id, listing_id],
        )?;
        Ok(())
    }

    /// Remove terminal-status queue rows and history rows older than
    /// `days`.
    pub async fn gc_old_notifications(&self, days: i64) -> Result<u64> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM notification_queue WHERE status IN ('sent', 'failed', 'rate_limited') AND created_at < datetime('now', '-' || ?1 || ' days')",
            rusqlite::params![days],
        )?;
        conn.execute(
            "DELETE FROM notification_history WHERE sent_at < datetime('now', '-' || ?1 || ' days')",
            rusqlite::params![days],
        )?;
        Ok(removed as u64)
    }
}
