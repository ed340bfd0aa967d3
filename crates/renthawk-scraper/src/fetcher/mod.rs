pub mod anti_bot;
pub mod decode;
pub mod profiles;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use renthawk_core::error::FetchError;
use reqwest::{redirect::Policy, Client};
use tokio::sync::{Mutex, Semaphore};

const MAX_REDIRECTS: usize = 10;
const MAX_ANTI_BOT_RETRIES: u32 = 4;
const MAX_RATE_LIMIT_RETRIES: u32 = 1;
const REFERER_HISTORY_LEN: usize = 5;

/// Result of a single successful fetch, after decompression and anti-bot
/// retry, handed to the Source Adapter for parsing.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub proxy: Option<String>,
}

/// Fetches URLs with browser-profile rotation, anti-bot detection and
/// retry, and transparent decompression. One instance is shared across a
/// scan cycle; its referer history and concurrency gate are per-instance,
/// not shared across Fetchers.
pub struct Fetcher {
    client: Client,
    semaphore: Arc<Semaphore>,
    referer_history: Mutex<VecDeque<String>>,
}

impl Fetcher {
    pub fn new(timeout: Duration, max_concurrent: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|source| FetchError::Transport {
                url: "<client-build>".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            referer_history: Mutex::new(VecDeque::with_capacity(REFERER_HISTORY_LEN)),
        })
    }

    /// Fetch `url`, retrying through browser profiles and evasion cookies
    /// when the response looks like an anti-bot challenge, and honoring
    /// `Retry-After` on 429s. Returns the decompressed body as text.
    pub async fn fetch(&self, url: &str, opts: &FetchOptions) -> Result<FetchResponse, FetchError> {
        let _permit = self.semaphore.acquire().await.expect("semaphore closed");
        let referer = self.current_referer().await;

        let mut attempt: u32 = 0;
        let mut rate_limit_attempts: u32 = 0;
        loop {
            let profile = profiles::profile_for_attempt(attempt as usize);

            let mut request = self
                .client
                .get(url)
                .header("User-Agent", profile.user_agent)
                .header("Accept-Language", profile.accept_language)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                );
            if let Some(ua) = profile.sec_ch_ua {
                request = request.header("sec-ch-ua", ua);
            }
            if let Some(platform) = profile.sec_ch_ua_platform {
                request = request.header("sec-ch-ua-platform", platform);
            }
            if let Some(ref_url) = &referer {
                request = request.header("Referer", ref_url.as_str());
            }
            if let Some((name, value)) = profiles::evasion_cookie_for_attempt(attempt as usize) {
                request = request.header("Cookie", format!("{name}={value}"));
            }
            if let Some(proxy) = &opts.proxy {
                request = request.header("X-Forwarded-Proxy-Hint", proxy.as_str());
            }

            let started = Instant::now();
            let response = request.send().await.map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();

            if status == 429 {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                if rate_limit_attempts >= MAX_RATE_LIMIT_RETRIES {
                    // One retry is all a 429 gets; past that it's treated as a
                    // transport failure rather than retried like an anti-bot
                    // challenge.
                    return match response.error_for_status() {
                        Err(source) => Err(FetchError::Transport { url: url.to_string(), source }),
                        Ok(_) => Err(FetchError::RateLimited {
                            url: url.to_string(),
                            retry_after_secs: retry_after,
                        }),
                    };
                }
                tokio::time::sleep(Duration::from_secs(retry_after.unwrap_or(2))).await;
                rate_limit_attempts += 1;
                continue;
            }

            let content_encoding = response
                .headers()
                .get(reqwest::header::CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let bytes = response.bytes().await.map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

            let body = match decode::decode_body(&bytes, content_encoding.as_deref()) {
                Some(text) => text,
                None => {
                    return Err(FetchError::Decode {
                        url: url.to_string(),
                        body_len: bytes.len(),
                    })
                }
            };

            let challenged = anti_bot::is_anti_bot_status(status) || anti_bot::looks_like_challenge(&body);
            if challenged {
                if attempt >= MAX_ANTI_BOT_RETRIES {
                    return Err(FetchError::AntiBotBlocked {
                        url: url.to_string(),
                        attempts: attempt + 1,
                    });
                }
                attempt += 1;
                continue;
            }

            let _elapsed = started.elapsed();
            self.push_referer(final_url.clone()).await;

            return Ok(FetchResponse {
                status,
                body,
                final_url,
            });
        }
    }

    async fn current_referer(&self) -> Option<String> {
        self.referer_history.lock().await.back().cloned()
    }

    async fn push_referer(&self, url: String) {
        let mut history = self.referer_history.lock().await;
        if history.len() == REFERER_HISTORY_LEN {
            history.pop_front();
        }
        history.push_back(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetcher_builds_with_sane_defaults() {
        let fetcher = Fetcher::new(Duration::from_secs(30), 4);
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn referer_history_starts_empty() {
        let fetcher = Fetcher::new(Duration::from_secs(30), 4).unwrap();
        assert_eq!(fetcher.current_referer().await, None);
    }

    #[tokio::test]
    async fn referer_history_caps_at_five_entries() {
        let fetcher = Fetcher::new(Duration::from_secs(30), 4).unwrap();
        for i in 0..8 {
            fetcher.push_referer(format!("https://example.test/{i}")).await;
        }
        let history = fetcher.referer_history.lock().await;
        assert_eq!(history.len(), REFERER_HISTORY_LEN);
        assert_eq!(history.front().unwrap(), "https://example.test/3");
    }
}
