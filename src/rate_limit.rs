use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_end_ms: i64, // unix millis when the window closes
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_time_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStats {
    pub window_ms: u64,
    pub max_requests: u32,
    pub active_clients: usize,
    pub total_requests: u64,
}

/// Fixed-window request counter keyed by client.
///
/// Windows are reset lazily by the check that finds them expired, so
/// [`RateLimiter::sweep_expired`] only reclaims memory.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.config.window.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn check_rate_limit(&self, key: &str) -> RateLimitDecision {
        self.check_rate_limit_at(key, now_ms())
    }

    pub fn check_rate_limit_at(&self, key: &str, now_ms: i64) -> RateLimitDecision {
        let max = self.config.max_requests;
        let fresh = RateLimitEntry {
            count: 1,
            window_end_ms: now_ms.saturating_add(self.window_ms()),
        };

        // the entry guard holds the shard lock for the whole read-modify-write
        let mut entry = match self.entries.entry(key.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                return admit_fresh(max, fresh);
            }
            Entry::Occupied(occupied) => occupied.into_ref(),
        };

        // window expired..? start a new one
        if now_ms > entry.window_end_ms {
            *entry = fresh;
            return admit_fresh(max, fresh);
        }

        entry.count = entry.count.saturating_add(1);

        if entry.count > max {
            let wait_ms = (entry.window_end_ms - now_ms).max(0) as u64;
            tracing::debug!(%key, count = entry.count, "rate limit exceeded");
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time_ms: entry.window_end_ms,
                retry_after_secs: Some(wait_ms.div_ceil(1000)),
            };
        }

        RateLimitDecision {
            allowed: true,
            remaining: max - entry.count,
            reset_time_ms: entry.window_end_ms,
            retry_after_secs: None,
        }
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(now_ms())
    }

    // Drop every entry whose window has already closed
    pub fn sweep_expired_at(&self, now_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.window_end_ms >= now_ms);
        before.saturating_sub(self.entries.len())
    }

    /// Forget a client's window entirely, un-throttling it.
    pub fn reset_key(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        tracing::info!(%key, removed, "reset rate limit");
        removed
    }

    pub fn stats(&self) -> RateLimitStats {
        let total_requests = self
            .entries
            .iter()
            .map(|entry| u64::from(entry.count))
            .sum();
        RateLimitStats {
            window_ms: self.window_ms() as u64,
            max_requests: self.config.max_requests,
            active_clients: self.entries.len(),
            total_requests,
        }
    }

    #[cfg(test)]
    fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| *entry)
    }
}

fn admit_fresh(max: u32, entry: RateLimitEntry) -> RateLimitDecision {
    RateLimitDecision {
        allowed: true,
        remaining: max.saturating_sub(1),
        reset_time_ms: entry.window_end_ms,
        retry_after_secs: None,
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const T0: i64 = 1_700_000_000_000;
    const WINDOW_MS: i64 = 900_000;

    fn test_limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window: Duration::from_millis(WINDOW_MS as u64),
            max_requests,
        })
    }

    #[test]
    fn test_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.window, Duration::from_millis(900_000));
        assert_eq!(config.max_requests, 100);
    }

    #[test]
    fn test_first_request_creates_entry() {
        let limiter = test_limiter(100);
        let decision = limiter.check_rate_limit_at("A", T0);

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 99);
        assert_eq!(decision.reset_time_ms, T0 + WINDOW_MS);
        assert_eq!(decision.retry_after_secs, None);
        assert_eq!(
            limiter.entry("A"),
            Some(RateLimitEntry { count: 1, window_end_ms: T0 + WINDOW_MS })
        );
    }

    #[test]
    fn test_quota_exhaustion() {
        let limiter = test_limiter(100);

        let mut last_remaining = None;
        for i in 0..100 {
            let decision = limiter.check_rate_limit_at("A", T0 + i);
            assert!(decision.allowed, "call {} should be allowed", i + 1);
            if let Some(prev) = last_remaining {
                assert!(decision.remaining < prev);
            }
            last_remaining = Some(decision.remaining);
        }
        assert_eq!(last_remaining, Some(0));

        let denied = limiter.check_rate_limit_at("A", T0 + 100);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        // 899_900 ms left rounds up to 900 seconds
        assert_eq!(denied.retry_after_secs, Some(900));
    }

    #[test]
    fn test_denied_request_is_counted() {
        let limiter = test_limiter(2);
        limiter.check_rate_limit_at("A", T0);
        limiter.check_rate_limit_at("A", T0);
        assert!(!limiter.check_rate_limit_at("A", T0).allowed);
        assert!(!limiter.check_rate_limit_at("A", T0).allowed);
        assert_eq!(limiter.entry("A").map(|e| e.count), Some(4));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let limiter = test_limiter(1);
        limiter.check_rate_limit_at("A", T0);
        let denied = limiter.check_rate_limit_at("A", T0 + WINDOW_MS - 1);
        assert_eq!(denied.retry_after_secs, Some(1));
    }

    #[test]
    fn test_window_end_is_still_live() {
        let limiter = test_limiter(1);
        limiter.check_rate_limit_at("A", T0);
        let at_end = limiter.check_rate_limit_at("A", T0 + WINDOW_MS);
        assert!(!at_end.allowed);
        assert_eq!(at_end.retry_after_secs, Some(0));
    }

    #[test]
    fn test_expired_window_behaves_like_fresh_key() {
        let limiter = test_limiter(3);
        for _ in 0..5 {
            limiter.check_rate_limit_at("A", T0);
        }

        let later = T0 + WINDOW_MS + 1;
        let decision = limiter.check_rate_limit_at("A", later);
        let fresh = test_limiter(3).check_rate_limit_at("Z", later);

        assert_eq!(decision, fresh);
        assert_eq!(
            limiter.entry("A"),
            Some(RateLimitEntry { count: 1, window_end_ms: later + WINDOW_MS })
        );
    }

    #[test]
    fn test_reset_key_behaves_like_fresh_key() {
        let limiter = test_limiter(1);
        limiter.check_rate_limit_at("A", T0);
        assert!(!limiter.check_rate_limit_at("A", T0 + 10).allowed);

        assert!(limiter.reset_key("A"));
        assert!(!limiter.reset_key("A"));

        let decision = limiter.check_rate_limit_at("A", T0 + 20);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.reset_time_ms, T0 + 20 + WINDOW_MS);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = test_limiter(5);
        for _ in 0..10 {
            limiter.check_rate_limit_at("A", T0);
        }
        assert!(!limiter.check_rate_limit_at("A", T0).allowed);

        let b = limiter.check_rate_limit_at("B", T0);
        assert!(b.allowed);
        assert_eq!(b.remaining, 4);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let limiter = test_limiter(10);
        limiter.check_rate_limit_at("old", T0);
        limiter.check_rate_limit_at("edge", T0 + 1_000);
        limiter.check_rate_limit_at("new", T0 + 5_000);

        let removed = limiter.sweep_expired_at(T0 + WINDOW_MS + 1_000);

        assert_eq!(removed, 1);
        assert!(limiter.entry("old").is_none());
        assert!(limiter.entry("edge").is_some());
        assert!(limiter.entry("new").is_some());
    }

    #[test]
    fn test_sweep_leaves_other_limiters_alone() {
        let a = test_limiter(10);
        let b = test_limiter(10);
        for key in ["a1", "a2", "a3", "a4", "a5"] {
            a.check_rate_limit_at(key, T0);
        }
        b.check_rate_limit_at("b1", T0);

        assert_eq!(b.sweep_expired_at(T0 + WINDOW_MS + 1), 1);
        assert_eq!(b.stats().active_clients, 0);
        assert_eq!(a.stats().active_clients, 5);
    }

    #[test]
    fn test_stats() {
        let limiter = test_limiter(10);
        for _ in 0..3 {
            limiter.check_rate_limit_at("A", T0);
        }
        limiter.check_rate_limit_at("B", T0);

        let stats = limiter.stats();
        assert_eq!(stats.window_ms, WINDOW_MS as u64);
        assert_eq!(stats.max_requests, 10);
        assert_eq!(stats.active_clients, 2);
        assert_eq!(stats.total_requests, 4);
    }

    #[test]
    fn test_concurrent_checks_do_not_undercount() {
        let limiter = Arc::new(test_limiter(1_000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        limiter.check_rate_limit_at("shared", T0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(limiter.entry("shared").map(|e| e.count), Some(800));
    }
}
