use anyhow::Result;
use chrono::{DateTime, Utc};
use renthawk_core::QueryUrl;

use crate::backend::DuckDbBackend;

fn parse_ts(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

impl DuckDbBackend {
    /// `request_body`/`custom_headers` are accepted by the CLI but dropped
    /// here — no column exists for them.
    pub async fn add_query_url(
        &self,
        source: &str,
        url: &str,
        description: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO query_urls (source, queryurl, method, enabled, description)
               VALUES (?1, ?2, 'GET', true, ?3)
               ON CONFLICT (source, queryurl) DO UPDATE SET description = excluded.description"#,
            rusqlite::params![source, url, description],
        )?;
        let id = conn
            .prepare("SELECT id FROM query_urls WHERE source = ?1 AND queryurl = ?2")?
            .query_row(rusqlite::params![source, url], |row| row.get(0))?;
        Ok(id)
    }

    pub async fn toggle_query_url(&self, id: i64, enabled: bool) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE query_urls SET enabled = ?1 WHERE id = ?2",
            rusqlite::params![enabled, id],
        )?;
        Ok(())
    }

    pub async fn delete_query_url(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM query_urls WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
    }

    pub async fn mark_query_url_scanned(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE query_urls SET last_scan_time = CURRENT_TIMESTAMP WHERE id = ?1",
            rusqlite::params![id],
        )?;
        Ok(())
    }

    /// Enabled query URLs, in ascending id order (the Scheduler's
    /// per-source scan order).
    pub async fn enabled_query_urls(&self, source: Option<&str>) -> Result<Vec<QueryUrl>> {
        let conn = self.conn.lock().await;
        let sql = match source {
            Some(_) => {
                "SELECT id, source, queryurl, method, enabled, CAST(last_scan_time AS VARCHAR), description \
                 FROM query_urls WHERE enabled = true AND source = ?1 ORDER BY id"
            }
            None => {
                "SELECT id, source, queryurl, method, enabled, CAST(last_scan_time AS VARCHAR), description \
                 FROM query_urls WHERE enabled = true ORDER BY id"
            }
        };
        let mut stmt = conn.prepare(sql)?;
        let rows: Vec<QueryUrl> = if let Some(source) = source {
            stmt.query_map(rusqlite::params![source], row_to_query_url)?
                .collect::<Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], row_to_query_url)?
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    pub async fn list_query_urls(&self) -> Result<Vec<QueryUrl>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, source, queryurl, method, enabled, CAST(last_scan_time AS VARCHAR), description \
             FROM query_urls ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], row_to_query_url)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_query_url(row: &rusqlite::Row) -> rusqlite::Result<QueryUrl> {
    Ok(QueryUrl {
        id: row.get(0)?,
        source: row.get(1)?,
        url: row.get(2)?,
        method: row.get(3)?,
        enabled: row.get(4)?,
        last_scan_time: parse_ts(row.get(5)?),
        description: row.get(6)?,
    })
}
