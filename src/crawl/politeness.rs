// src/crawl/politeness.rs
// =============================================================================
// Per-host politeness.
//
// At most one request per host per politeness delay. Limiting per host means
// that with several workers, pages on different hosts can be fetched at the
// same time while each host still sees the configured request rate. With a
// single worker this amounts to waiting between fetches to the same host.
//
// Backed by a governor keyed rate limiter. A zero delay turns it off.
// =============================================================================

use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

pub struct Politeness {
    limiter: Option<DefaultKeyedRateLimiter<String>>,
}

impl Politeness {
    pub fn new(delay: Duration) -> Self {
        // Quota::with_period returns None for a zero period
        let limiter = Quota::with_period(delay).map(RateLimiter::keyed);
        Self { limiter }
    }

    // Waits until `host` may be contacted again
    pub async fn wait(&self, host: &str) {
        if let Some(limiter) = &self.limiter {
            limiter.until_key_ready(&host.to_string()).await;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_zero_delay_is_disabled() {
        let p = Politeness::new(Duration::ZERO);
        assert!(!p.is_enabled());

        let start = Instant::now();
        for _ in 0..10 {
            p.wait("www.ics.uci.edu").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_same_host_is_spaced_out() {
        let p = Politeness::new(Duration::from_millis(100));
        let start = Instant::now();
        p.wait("www.ics.uci.edu").await;
        p.wait("www.ics.uci.edu").await;
        p.wait("www.ics.uci.edu").await;
        // First request is immediate, the next two wait one period each
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    #[tokio::test]
    async fn test_different_hosts_do_not_wait_on_each_other() {
        let p = Politeness::new(Duration::from_secs(5));
        let start = Instant::now();
        p.wait("www.ics.uci.edu").await;
        p.wait("www.cs.uci.edu").await;
        p.wait("www.stat.uci.edu").await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
