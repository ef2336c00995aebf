use std::hash::Hash;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Fixed-window counters keyed by `K`. A window opens on the first hit for a
/// key and restarts on the first hit after it lapses.
struct Windows<K> {
    /// key -> (hits, window_start)
    entries: DashMap<K, (u32, Instant)>,
    limit: u32,
    window: Duration,
}

impl<K: Eq + Hash> Windows<K> {
    fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
        }
    }

    fn retry_after(&self, start: Instant, now: Instant) -> u64 {
        self.window
            .saturating_sub(now.duration_since(start))
            .as_secs()
            .max(1)
    }

    /// Retry-after seconds if `key` is at the limit, without counting.
    fn blocked(&self, key: &K) -> Option<u64> {
        let now = Instant::now();
        let (hits, start) = *self.entries.get(key)?;
        let open = now.duration_since(start) <= self.window;
        (open && hits >= self.limit).then(|| self.retry_after(start, now))
    }

    /// Count a hit unless `key` is already at the limit.
    fn hit(&self, key: K) -> Result<(), u64> {
        let now = Instant::now();
        let mut entry = self.entries.entry(key).or_insert((0, now));
        let (hits, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *hits = 0;
            *start = now;
        }
        if *hits >= self.limit {
            return Err(self.retry_after(*start, now));
        }
        *hits += 1;
        Ok(())
    }

    fn remove(&self, key: &K) {
        self.entries.remove(key);
    }

    fn cleanup(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) < self.window);
    }
}

/// Per-IP request limiter for the public chat and reset endpoints.
pub struct IpRateLimiter(Windows<IpAddr>);

impl IpRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self(Windows::new(limit, window))
    }

    /// Count a request. Returns Err with retry-after seconds when over the limit.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.0.hit(ip)
    }

    pub fn cleanup(&self) {
        self.0.cleanup();
    }
}

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
const LOGIN_MAX_FAILURES: u32 = 5;

/// Locks an email out after repeated failed logins. Only failures count, and a
/// successful login clears the slate.
pub struct LoginRateLimiter(Windows<String>);

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self(Windows::new(LOGIN_MAX_FAILURES, LOGIN_WINDOW))
    }

    pub fn check(&self, email: &str) -> Result<(), u64> {
        match self.0.blocked(&email.to_lowercase()) {
            Some(retry_after) => Err(retry_after),
            None => Ok(()),
        }
    }

    pub fn record_failure(&self, email: &str) {
        // Already locked out; nothing more to count
        let _ = self.0.hit(email.to_lowercase());
    }

    pub fn clear(&self, email: &str) {
        self.0.remove(&email.to_lowercase());
    }

    pub fn cleanup(&self) {
        self.0.cleanup();
    }
}
