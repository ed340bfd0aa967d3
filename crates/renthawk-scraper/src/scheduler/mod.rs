pub mod state;

use std::time::{Duration, Instant};

use renthawk_core::config::ScraperConfig;
use renthawk_store::DuckDbBackend;
use tracing::{info, warn};

use crate::adapters::{self, fill_city_from_context, SourceAdapter};
use crate::fetcher::{FetchOptions, Fetcher};
use crate::proxy::ProxyPool;

use state::{evaluate, ScanOutcome, SourceHealth};

#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    /// Empty means every source returned by `adapters::known_sources()`.
    pub sources: Vec<String>,
    pub max_results_per_page: usize,
    pub skip_cities: bool,
    pub skip_query_urls: bool,
}

pub struct Scheduler {
    store: DuckDbBackend,
    fetcher: Fetcher,
    config: ScraperConfig,
    cities: Vec<String>,
    options: SchedulerOptions,
    proxy_pool: Option<ProxyPool>,
}

impl Scheduler {
    pub fn new(store: DuckDbBackend, fetcher: Fetcher, config: ScraperConfig, cities: Vec<String>) -> Self {
        Self::with_options(store, fetcher, config, cities, SchedulerOptions::default())
    }

    pub fn with_options(
        store: DuckDbBackend,
        fetcher: Fetcher,
        config: ScraperConfig,
        cities: Vec<String>,
        options: SchedulerOptions,
    ) -> Self {
        let proxy_pool = (config.use_proxies && !config.proxy_list.is_empty())
            .then(|| ProxyPool::new(config.proxy_list.clone(), config.proxy_rotation));
        Self {
            store,
            fetcher,
            config,
            cities,
            options,
            proxy_pool,
        }
    }

    fn sources(&self) -> Vec<&str> {
        if self.options.sources.is_empty() {
            adapters::known_sources()
        } else {
            self.options.sources.iter().map(String::as_str).collect()
        }
    }

    /// Run the continuous scan loop until `stop` resolves, sleeping for
    /// the configured interval between cycles.
    pub async fn run(&self, mut stop: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        loop {
            if let Err(err) = self.run_cycle().await {
                warn!(error = %err, "scan cycle failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.scan_interval()) => {}
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!("scheduler received stop signal, exiting");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One full pass: every source's query URLs, then every `(source,
    /// city)` pair not covered by a query URL.
    pub async fn run_cycle(&self) -> anyhow::Result<()> {
        let sources = self.sources();
        if !self.options.skip_query_urls {
            for source in &sources {
                self.scan_source_query_urls(source).await;
            }
        }
        if !self.options.skip_cities {
            for source in &sources {
                for city in &self.cities {
                    self.scan_source_city(source, city).await;
                }
            }
        }
        Ok(())
    }

    async fn scan_source_query_urls(&self, source: &str) {
        let Ok(adapter) = adapters::adapter_for(source) else {
            return;
        };
        let query_urls = match self.store.enabled_query_urls(Some(source)).await {
            Ok(urls) => urls,
            Err(err) => {
                warn!(source, error = %err, "failed to load query urls");
                return;
            }
        };

        let mut first_in_cycle = true;
        for query_url in query_urls {
            if let Some(last) = query_url.last_scan_time {
                if elapsed_since(last) < self.config.scan_interval() {
                    continue;
                }
            }

            let outcome = match self.scan_one(adapter.as_ref(), &query_url.url, "", query_url.id).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(source, url = %query_url.url, error = %err, "scan failed, recording empty result and continuing");
                    let key = format!("query_url_{}", query_url.id);
                    if let Err(store_err) = self
                        .store
                        .update_scan_history(adapter.name(), &key, &query_url.url, 0, 0, 0)
                        .await
                    {
                        warn!(source, error = %store_err, "failed to record scan_history after a failed scan");
                    }
                    CycleOutcome {
                        new_count: 0,
                        total_count: 0,
                        final_url: query_url.url.clone(),
                    }
                }
            };

            let pagination_ended = adapter.pagination_ended(&query_url.url, &outcome.final_url);
            let (health, stop) = evaluate(
                first_in_cycle,
                &ScanOutcome {
                    new_count: outcome.new_count,
                    total_count: outcome.total_count,
                },
                adapter.stop_after_no_result(),
                pagination_ended,
            );
            first_in_cycle = false;

            if health == SourceHealth::Broken {
                warn!(source, url = %query_url.url, "source looks broken (zero results on first scan)");
            } else if health == SourceHealth::Exhausted {
                info!(source, url = %query_url.url, "source exhausted for this cycle");
            }

            if stop {
                break;
            }
        }
    }

    async fn scan_source_city(&self, source: &str, city: &str) {
        let Ok(adapter) = adapters::adapter_for(source) else {
            return;
        };
        match self.store.last_scan_time(source, city).await {
            Ok(Some(last)) if elapsed_since(last) < self.config.scan_interval() => return,
            Ok(_) => {}
            Err(err) => {
                warn!(source, city, error = %err, "failed to read last scan time");
                return;
            }
        }

        let url = adapter.build_url(city, 1);
        if let Err(err) = self.scan_one(adapter.as_ref(), &url, city, -1).await {
            warn!(source, city, error = %err, "scan failed, recording empty result");
            if let Err(store_err) = self.store.update_scan_history(source, city, &url, 0, 0, 0).await {
                warn!(source, city, error = %store_err, "failed to record scan_history after a failed scan");
            }
        }
    }

    async fn scan_one(
        &self,
        adapter: &dyn SourceAdapter,
        url: &str,
        scanned_city: &str,
        query_url_id: i64,
    ) -> anyhow::Result<CycleOutcome> {
        let started = Instant::now();
        let proxy = match &self.proxy_pool {
            Some(pool) => pool.get_proxy().await,
            None => None,
        };
        let fetch_opts = FetchOptions { proxy: proxy.clone() };
        let response = self.fetcher.fetch(url, &fetch_opts).await;
        let response = match (response, &self.proxy_pool, &proxy) {
            (Ok(response), Some(pool), Some(addr)) => {
                pool.report_success(addr, started.elapsed()).await;
                response
            }
            (Ok(response), _, _) => response,
            (Err(err), Some(pool), Some(addr)) => {
                pool.report_failure(addr).await;
                return Err(err.into());
            }
            (Err(err), _, _) => return Err(err.into()),
        };

        let mut listings = adapter
            .parse_listing_page(&response.body)
            .map_err(anyhow::Error::from)?;
        fill_city_from_context(&mut listings, scanned_city, &self.known_city_refs());
        if self.options.max_results_per_page > 0 {
            listings.truncate(self.options.max_results_per_page);
        }

        let total_count = listings.len();
        let mut new_count = 0;
        for listing in &listings {
            if listing.price_numeric <= 0 {
                warn!(source = adapter.name(), url = %listing.url, "skipping listing with unparsed price");
                continue;
            }
            let is_new = match self.store.upsert_listing(listing).await {
                Ok(is_new) => is_new,
                Err(err) => {
                    warn!(source = adapter.name(), url = %listing.url, error = %err, "failed to upsert listing, continuing scan");
                    continue;
                }
            };
            if is_new {
                new_count += 1;
                if let Some(listing_id) = self.store.get_listing_id(&listing.source, &listing.source_id).await? {
                    self.store.enqueue_matches(listing_id).await?;
                }
            }
        }

        let key = if query_url_id >= 0 {
            format!("query_url_{query_url_id}")
        } else if scanned_city.is_empty() {
            adapter.name().to_string()
        } else {
            scanned_city.to_string()
        };
        self.store
            .update_scan_history(
                adapter.name(),
                &key,
                url,
                new_count as i32,
                total_count as i32,
                started.elapsed().as_millis() as i64,
            )
            .await?;
        if query_url_id >= 0 {
            self.store.mark_query_url_scanned(query_url_id).await?;
        }

        Ok(CycleOutcome {
            new_count,
            total_count,
            final_url: response.final_url,
        })
    }

    fn known_city_refs(&self) -> Vec<&str> {
        self.cities.iter().map(String::as_str).collect()
    }
}

struct CycleOutcome {
    new_count: usize,
    total_count: usize,
    final_url: String,
}

fn elapsed_since(timestamp: chrono::DateTime<chrono::Utc>) -> Duration {
    let elapsed = chrono::Utc::now().signed_duration_since(timestamp);
    Duration::from_secs(elapsed.num_seconds().max(0) as u64)
}
