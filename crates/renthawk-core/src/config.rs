use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRotation {
    RoundRobin,
    Random,
    Fallback,
}

impl ProxyRotation {
    fn parse(raw: &str) -> Self {
        match raw {
            "random" => ProxyRotation::Random,
            "fallback" => ProxyRotation::Fallback,
            _ => ProxyRotation::RoundRobin,
        }
    }
}

/// Immutable configuration for the scraper process, assembled once at
/// startup. There is no live-reload.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub db_path: String,
    pub scan_interval_seconds: u64,
    pub http_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    pub use_proxies: bool,
    pub proxy_list: Vec<String>,
    pub proxy_rotation: ProxyRotation,
}

impl ScraperConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            db_path: std::env::var("RENTHAWK_DB_PATH")
                .unwrap_or_else(|_| "./renthawk.db".to_string()),
            scan_interval_seconds: std::env::var("RENTHAWK_SCAN_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60)
                .clamp(10, 3600),
            http_timeout_seconds: std::env::var("RENTHAWK_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_concurrent_requests: std::env::var("RENTHAWK_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            use_proxies: std::env::var("RENTHAWK_USE_PROXIES")
                .map(|v| v == "true")
                .unwrap_or(false),
            proxy_list: std::env::var("RENTHAWK_PROXY_LIST")
                .map(|v| v.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect())
                .unwrap_or_default(),
            proxy_rotation: ProxyRotation::parse(
                &std::env::var("RENTHAWK_PROXY_ROTATION").unwrap_or_else(|_| "round_robin".to_string()),
            ),
        })
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_seconds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Immutable configuration for the notifier process.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub db_path: String,
    pub bot_token: String,
    pub admin_ids: Vec<i64>,
    pub notification_interval_seconds: u64,
    pub max_notifications_per_user_per_day: u32,
    pub notification_batch_size: u32,
    pub notification_retry_attempts: u32,
}

impl NotifierConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            db_path: std::env::var("RENTHAWK_DB_PATH")
                .unwrap_or_else(|_| "./renthawk.db".to_string()),
            bot_token: std::env::var("RENTHAWK_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("RENTHAWK_BOT_TOKEN is required"))?,
            admin_ids: std::env::var("RENTHAWK_ADMIN_IDS")
                .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
                .unwrap_or_default(),
            notification_interval_seconds: std::env::var("RENTHAWK_NOTIFICATION_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30)
                .clamp(5, 3600),
            max_notifications_per_user_per_day: std::env::var(
                "RENTHAWK_MAX_NOTIFICATIONS_PER_USER_PER_DAY",
            )
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20),
            notification_batch_size: std::env::var("RENTHAWK_NOTIFICATION_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            notification_retry_attempts: std::env::var("RENTHAWK_NOTIFICATION_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }

    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.notification_interval_seconds)
    }
}
