/// A browser identity the Fetcher can present: user-agent plus the
/// client-hint headers real browsers send alongside it. Chosen per
/// request from this fixed table; retries rotate to the next
/// profile rather than reusing a blocked one.
#[derive(Debug, Clone, Copy)]
pub struct BrowserProfile {
    pub user_agent: &'static str,
    pub sec_ch_ua: Option<&'static str>,
    pub sec_ch_ua_platform: Option<&'static str>,
    pub accept_language: &'static str,
}

pub const BROWSER_PROFILES: &[BrowserProfile] = &[
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\""),
        sec_ch_ua_platform: Some("\"Windows\""),
        accept_language: "nl-NL,nl;q=0.9,en-US;q=0.8,en;q=0.7",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        sec_ch_ua: None,
        sec_ch_ua_platform: Some("\"macOS\""),
        accept_language: "nl-NL,nl;q=0.9,en;q=0.8",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
        sec_ch_ua: None,
        sec_ch_ua_platform: Some("\"Windows\""),
        accept_language: "nl,en-US;q=0.7,en;q=0.3",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
        sec_ch_ua: None,
        sec_ch_ua_platform: Some("\"Linux\""),
        accept_language: "en-US,en;q=0.5",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
        sec_ch_ua: Some("\"Microsoft Edge\";v=\"124\", \"Chromium\";v=\"124\", \"Not-A.Brand\";v=\"99\""),
        sec_ch_ua_platform: Some("\"Windows\""),
        accept_language: "nl-NL,nl;q=0.9,en-US;q=0.8",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
        sec_ch_ua: Some("\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\""),
        sec_ch_ua_platform: Some("\"Android\""),
        accept_language: "nl-NL,nl;q=0.9",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
        sec_ch_ua: None,
        sec_ch_ua_platform: Some("\"iOS\""),
        accept_language: "nl-NL,nl;q=0.9",
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\""),
        sec_ch_ua_platform: Some("\"macOS\""),
        accept_language: "nl-NL,nl;q=0.9,en;q=0.8",
    },
];

/// Pick a profile deterministically from an attempt counter so retries
/// cycle through the whole table instead of repeating the blocked one.
pub fn profile_for_attempt(attempt: usize) -> &'static BrowserProfile {
    &BROWSER_PROFILES[attempt % BROWSER_PROFILES.len()]
}

/// Evasion cookies some CDN challenge pages expect to see on retry.
pub fn evasion_cookie_for_attempt(attempt: usize) -> Option<(&'static str, String)> {
    match attempt % 3 {
        1 => Some(("__cf_chl_rt_tk", format!("evade-{attempt}"))),
        2 => Some(("bm_sz", format!("evade-{attempt}"))),
        _ => None,
    }
}
