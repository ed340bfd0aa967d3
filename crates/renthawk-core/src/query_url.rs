use chrono::{DateTime, Utc};
use serde::Serialize;

/// Operator-supplied alternative to city-based scanning.
#[derive(Debug, Clone, Serialize)]
pub struct QueryUrl {
    pub id: i64,
    pub source: String,
    pub url: String,
    pub method: String,
    pub enabled: bool,
    pub last_scan_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Fields the CLI accepts for `add-query-url` but that the store does not
/// persist — no `request_body`/`custom_headers` column exists in
/// `query_urls`.
#[derive(Debug, Clone, Default)]
pub struct UnpersistedQueryUrlExtras {
    pub request_body: Option<String>,
    pub custom_headers: Option<String>,
}
