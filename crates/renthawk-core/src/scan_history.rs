use chrono::{DateTime, Utc};
use serde::Serialize;

/// Record of the most recent scan of a `(source, key)` pair, where `key`
/// is either an upper-cased city name or the sentinel `query_url_{id}`.
/// `UNIQUE(source, key)` means a rescan overwrites this row rather than
/// appending a new one.
#[derive(Debug, Clone, Serialize)]
pub struct ScanHistory {
    pub source: String,
    pub key: String,
    pub url: String,
    pub scanned_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub new_count: i32,
    pub total_count: i32,
}
