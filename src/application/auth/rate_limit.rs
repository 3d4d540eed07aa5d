use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sliding-window limiter for login attempts, keyed by normalised email.
#[derive(Debug, Clone)]
pub struct LoginRateLimiter {
    window: Duration,
    max_attempts: u32,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
}

impl LoginRateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            window,
            max_attempts,
            buckets: Arc::new(DashMap::new()),
        }
    }

    /// Record an attempt for `key`; returns `false` once the window is full.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        // must run before `entry` takes its shard lock
        self.sweep(now);

        let mut entry = self.buckets.entry(key.to_string()).or_default();

        if entry.len() as u32 >= self.max_attempts {
            return false;
        }

        entry.push(now);
        true
    }

    pub fn reset(&self, key: &str) {
        self.buckets.remove(key);
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    /// Forget attempts older than the window and drop keys left with none.
    fn sweep(&self, now: Instant) {
        let window = self.window;
        self.buckets.retain(|_, attempts| {
            attempts.retain(|instant| now.duration_since(*instant) < window);
            !attempts.is_empty()
        });
    }
}
