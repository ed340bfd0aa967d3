use thiserror::Error;

/// Errors surfaced by the HTTP Fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("rate limited fetching {url}, retry_after={retry_after_secs:?}")]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("anti-bot challenge blocked {url} after {attempts} attempts")]
    AntiBotBlocked { url: String, attempts: u32 },

    #[error("could not decode response body from {url} ({body_len} bytes) with any known codec")]
    Decode { url: String, body_len: usize },
}

/// Errors surfaced while a Source Adapter parses a list page.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no adapter registered for source {0:?}")]
    UnknownSource(String),

    #[error("failed to parse listing on {source}: {reason}")]
    ParseError { source: String, reason: String },
}
