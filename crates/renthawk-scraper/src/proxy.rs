use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use renthawk_core::config::ProxyRotation;
use tokio::sync::Mutex;

const MAX_FAILURES: u32 = 5;

#[derive(Debug, Clone)]
struct ProxyHealth {
    address: String,
    successes: u64,
    failures: u32,
    healthy: bool,
    avg_response_time_ms: f64,
    last_used: Option<Instant>,
    last_success: Option<Instant>,
}

impl ProxyHealth {
    fn new(address: String) -> Self {
        Self {
            address,
            successes: 0,
            failures: 0,
            healthy: true,
            avg_response_time_ms: 0.0,
            last_used: None,
            last_success: None,
        }
    }
}

struct Inner {
    proxies: Vec<ProxyHealth>,
    next_index: usize,
}

/// Health-tracked pool of proxies, polymorphic over three rotation
/// strategies. All mutating operations serialize through one lock.
pub struct ProxyPool {
    rotation: ProxyRotation,
    inner: Arc<Mutex<Inner>>,
}

impl ProxyPool {
    pub fn new(addresses: Vec<String>, rotation: ProxyRotation) -> Self {
        Self {
            rotation,
            inner: Arc::new(Mutex::new(Inner {
                proxies: addresses.into_iter().map(ProxyHealth::new).collect(),
                next_index: 0,
            })),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.proxies.is_empty()
    }

    /// Draw a healthy proxy address per the configured rotation strategy.
    /// Returns `None` if no proxy is healthy.
    pub async fn get_proxy(&self) -> Option<String> {
        let mut inner = self.inner.lock().await;
        let healthy_indices: Vec<usize> = inner
            .proxies
            .iter()
            .enumerate()
            .filter(|(_, p)| p.healthy)
            .map(|(i, _)| i)
            .collect();
        if healthy_indices.is_empty() {
            return None;
        }

        let chosen = match self.rotation {
            ProxyRotation::RoundRobin => {
                let idx = healthy_indices[inner.next_index % healthy_indices.len()];
                inner.next_index = inner.next_index.wrapping_add(1);
                idx
            }
            ProxyRotation::Random => {
                let pick = rand::thread_rng().gen_range(0..healthy_indices.len());
                healthy_indices[pick]
            }
            ProxyRotation::Fallback => healthy_indices[0],
        };

        inner.proxies[chosen].last_used = Some(Instant::now());
        Some(inner.proxies[chosen].address.clone())
    }

    pub async fn report_success(&self, address: &str, response_time: Duration) {
        let mut inner = self.inner.lock().await;
        if let Some(p) = inner.proxies.iter_mut().find(|p| p.address == address) {
            p.successes += 1;
            p.failures = 0;
            p.healthy = true;
            p.last_success = Some(Instant::now());
            let sample = response_time.as_millis() as f64;
            p.avg_response_time_ms = if p.successes == 1 {
                sample
            } else {
                0.9 * p.avg_response_time_ms + 0.1 * sample
            };
        }
    }

    pub async fn report_failure(&self, address: &str) {
        let mut inner = self.inner.lock().await;
        if let Some(p) = inner.proxies.iter_mut().find(|p| p.address == address) {
            p.failures += 1;
            if p.failures >= MAX_FAILURES {
                p.healthy = false;
            }
        }
    }

    /// Fraction of the pool currently healthy. The caller decides whether
    /// to `reset_all()` or `refresh()` when this drops below half.
    pub async fn healthy_fraction(&self) -> f64 {
        let inner = self.inner.lock().await;
        if inner.proxies.is_empty() {
            return 1.0;
        }
        let healthy = inner.proxies.iter().filter(|p| p.healthy).count();
        healthy as f64 / inner.proxies.len() as f64
    }

    pub async fn reset_all(&self) {
        let mut inner = self.inner.lock().await;
        for p in inner.proxies.iter_mut() {
            p.healthy = true;
            p.failures = 0;
        }
    }

    pub async fn add_proxy(&self, address: String) {
        let mut inner = self.inner.lock().await;
        if !inner.proxies.iter().any(|p| p.address == address) {
            inner.proxies.push(ProxyHealth::new(address));
        }
    }

    pub async fn remove_proxy(&self, address: &str) {
        let mut inner = self.inner.lock().await;
        inner.proxies.retain(|p| p.address != address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn proxy_becomes_unhealthy_after_max_consecutive_failures() {
        let pool = ProxyPool::new(vec!["p1".into()], ProxyRotation::RoundRobin);
        for _ in 0..MAX_FAILURES {
            pool.report_failure("p1").await;
        }
        assert_eq!(pool.get_proxy().await, None);
    }

    #[tokio::test]
    async fn success_resets_failure_streak() {
        let pool = ProxyPool::new(vec!["p1".into()], ProxyRotation::RoundRobin);
        pool.report_failure("p1").await;
        pool.report_failure("p1").await;
        pool.report_success("p1", Duration::from_millis(100)).await;
        for _ in 0..MAX_FAILURES - 1 {
            pool.report_failure("p1").await;
        }
        assert_eq!(pool.get_proxy().await.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn round_robin_cycles_through_healthy_proxies() {
        let pool = ProxyPool::new(vec!["p1".into(), "p2".into()], ProxyRotation::RoundRobin);
        let first = pool.get_proxy().await;
        let second = pool.get_proxy().await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn ewma_response_time_updates_toward_new_samples() {
        let pool = ProxyPool::new(vec!["p1".into()], ProxyRotation::RoundRobin);
        pool.report_success("p1", Duration::from_millis(100)).await;
        pool.report_success("p1", Duration::from_millis(200)).await;
        let inner = pool.inner.lock().await;
        let avg = inner.proxies[0].avg_response_time_ms;
        assert!((avg - 110.0).abs() < 1.0);
    }
}
