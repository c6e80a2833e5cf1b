//! API call rate limiting.
//!
//! Permits are minted by a background ticker on a jittered cadence and
//! buffered in a small queue. Every API call acquires a permit before it
//! executes, which caps the request rate regardless of how many logical
//! requests are queued up behind the client.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Maximum number of unconsumed permits buffered at once.
const QUEUE_CAPACITY: usize = 3;

/// Permits minted immediately at startup to avoid a slow ramp-up.
const STARTUP_BURST: usize = 2;

/// Base interval between two minted permits.
const BASE_INTERVAL_MS: u64 = 100;

/// Maximum additional random interval added to [`BASE_INTERVAL_MS`].
const MAX_ADDITIONAL_INTERVAL_MS: u64 = 500;

/// Issues permits for API calls on a steady, jittered cadence.
///
/// When the queue is full the oldest buffered permit is evicted rather than
/// blocking the ticker, so buffered permits are a rough rate cap and not an
/// exact counter. Dropping the limiter stops the ticker.
#[derive(Debug)]
pub struct RateLimiter {
    inner: Arc<Inner>,
    ticker: JoinHandle<()>,
}

#[derive(Debug)]
struct Inner {
    permits: Mutex<VecDeque<u64>>,
    notify: Notify,
}

impl Inner {
    fn mint(&self, seq: u64) {
        let mut permits = self.permits.lock().unwrap();
        if permits.len() == QUEUE_CAPACITY {
            permits.pop_front();
        }
        permits.push_back(seq);
        drop(permits);
        self.notify.notify_one();
    }

    fn take(&self) -> Option<u64> {
        self.permits.lock().unwrap().pop_front()
    }
}

impl RateLimiter {
    /// Create a new rate limiter and start its ticker.
    pub fn new() -> Self {
        let inner = Arc::new(Inner {
            permits: Mutex::new(VecDeque::with_capacity(QUEUE_CAPACITY)),
            notify: Notify::new(),
        });

        let ticker_inner = Arc::clone(&inner);
        let ticker = tokio::spawn(async move {
            let mut seq: u64 = 0;
            for _ in 0..STARTUP_BURST {
                ticker_inner.mint(seq);
                seq += 1;
            }
            loop {
                let jitter = rand::thread_rng().gen_range(0..MAX_ADDITIONAL_INTERVAL_MS);
                sleep(Duration::from_millis(BASE_INTERVAL_MS + jitter)).await;
                ticker_inner.mint(seq);
                seq += 1;
            }
        });

        Self { inner, ticker }
    }

    /// Wait until a permit is available and consume it.
    ///
    /// Returns the permit's sequence number. Never fails; callers waiting
    /// here are expected to be cancelled via their surrounding task scope on
    /// shutdown.
    pub async fn acquire(&self) -> u64 {
        loop {
            let notified = self.inner.notify.notified();
            if let Some(seq) = self.inner.take() {
                // Pass any stored wakeup on to the next waiter.
                self.inner.notify.notify_one();
                return seq;
            }
            notified.await;
        }
    }

    /// Consume a permit if one is immediately available.
    pub fn try_acquire(&self) -> Option<u64> {
        self.inner.take()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}
