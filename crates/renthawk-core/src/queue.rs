use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processing,
    Sent,
    Failed,
    RateLimited,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Sent => "sent",
            QueueStatus::Failed => "failed",
            QueueStatus::RateLimited => "rate_limited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QueueStatus::Pending),
            "processing" => Some(QueueStatus::Processing),
            "sent" => Some(QueueStatus::Sent),
            "failed" => Some(QueueStatus::Failed),
            "rate_limited" => Some(QueueStatus::RateLimited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub status: QueueStatus,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}
