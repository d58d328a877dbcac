//! Per-client token bucket rate limiting.
//!
//! Each client identity gets its own bucket, created full on first sight.
//! Buckets refill continuously at `rate` tokens per second up to `burst`
//! and are dropped after `idle_ttl` without activity. Eviction happens
//! opportunistically inside [`RateLimiter::admit`], so the limiter needs
//! no background task.
//!
//! Time comes from [`tokio::time::Instant`], which follows the paused
//! test clock under `start_paused` runtimes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl Bucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
            last_seen: now,
        }
    }

    fn refill(&mut self, rate: f64, capacity: f64, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(capacity);
        self.last_refill = now;
    }
}

#[derive(Debug)]
struct Buckets {
    map: HashMap<String, Bucket>,
    last_sweep: Instant,
}

/// Token bucket rate limiter keyed by client identity.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<Buckets>,
    rate: f64,
    capacity: f64,
    idle_ttl: Duration,
    sweep_interval: Duration,
}

impl RateLimiter {
    /// `rate` tokens per second, bucket capacity `burst`, buckets dropped
    /// after `idle_ttl` without a request.
    pub fn new(rate: f64, burst: u32, idle_ttl: Duration) -> Self {
        // Sweeping more than once a minute buys nothing; tiny TTLs still
        // sweep at least once per TTL.
        let sweep_interval = idle_ttl.min(Duration::from_secs(60));
        Self {
            buckets: Mutex::new(Buckets {
                map: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            rate,
            capacity: f64::from(burst),
            idle_ttl,
            sweep_interval,
        }
    }

    /// Decide whether one request from `identity` may proceed.
    ///
    /// Never blocks: either a token is available and is consumed, or the
    /// request is rejected. Rejected requests do not drain the bucket.
    pub fn admit(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap();

        if now.duration_since(buckets.last_sweep) >= self.sweep_interval {
            buckets
                .map
                .retain(|_, b| now.duration_since(b.last_seen) < self.idle_ttl);
            buckets.last_sweep = now;
        }

        let bucket = buckets
            .map
            .entry(identity.to_string())
            .or_insert_with(|| Bucket::new(self.capacity, now));
        bucket.refill(self.rate, self.capacity, now);
        bucket.last_seen = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Number of identities currently tracked. Diagnostic; exercised by
    /// the eviction tests.
    pub fn tracked_identities(&self) -> usize {
        self.buckets.lock().unwrap().map.len()
    }
}
