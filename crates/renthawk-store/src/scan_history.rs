use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::backend::DuckDbBackend;

impl DuckDbBackend {
    /// `UNIQUE(source, key)` means this overwrites any prior row for the
    /// same pair rather than appending.
    pub async fn update_scan_history(
        &self,
        source: &str,
        key: &str,
        url: &str,
        new_count: i32,
        total_count: i32,
        duration_ms: i64,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO scan_history (source, city, url, scanned_at, duration_ms, new_count, total_count)
               VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, ?4, ?5, ?6)
               ON CONFLICT (source, city) DO UPDATE SET
                   url = excluded.url,
                   scanned_at = excluded.scanned_at,
                   duration_ms = excluded.duration_ms,
                   new_count = excluded.new_count,
                   total_count = excluded.total_count"#,
            rusqlite::params![source, key, url, duration_ms, new_count, total_count],
        )?;
        Ok(())
    }

    pub async fn last_scan_time(&self, source: &str, key: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().await;
        let ts: Option<String> = conn
            .prepare("SELECT CAST(scanned_at AS VARCHAR) FROM scan_history WHERE source = ?1 AND city = ?2")?
            .query_row(rusqlite::params![source, key], |row| row.get(0))
            .ok();
        Ok(ts.and_then(|s| {
            chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        }))
    }
}
