//! Fixed-window rate limiting keyed by client IP and authentication state.

pub mod middleware;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::cache::{RedisCache, keys};
use crate::config::RateLimitConfig;

/// Counter state after recording one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    pub count: u64,
    pub resets_in: Duration,
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record a hit for `key` and return the count within the current window.
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, String>;

    /// Drop windows that have expired. Returns how many were removed.
    async fn sweep(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    window: Duration,
    count: u64,
}

impl Window {
    fn expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.window
    }
}

/// Process-local counters. Not shared across instances.
#[derive(Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_at(&self, key: &str, window: Duration, now: Instant) -> WindowHit {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            window,
            count: 0,
        });
        if entry.expired_at(now) {
            *entry = Window {
                started: now,
                window,
                count: 0,
            };
        }
        entry.count += 1;

        WindowHit {
            count: entry.count,
            resets_in: window.saturating_sub(now.duration_since(entry.started)),
        }
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let before = windows.len();
        windows.retain(|_, w| !w.expired_at(now));
        before - windows.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, String> {
        Ok(self.hit_at(key, window, Instant::now()))
    }

    async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }
}

/// Time left on a Redis counter from its `PTTL`, or `None` when the key has no
/// expiry (a new window, or an earlier `PEXPIRE` that never landed) and one must be set.
pub fn remaining_ttl(pttl_ms: i64) -> Option<Duration> {
    u64::try_from(pttl_ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

#[async_trait]
impl RateLimitStore for RedisCache {
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, String> {
        let key = keys::rate_limit(key);
        let mut conn = self.connection();
        let window_ms = window.as_millis().max(1) as u64;

        let (count, ttl_ms): (u64, i64) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(&key)
            .cmd("PTTL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| e.to_string())?;

        let resets_in = match remaining_ttl(ttl_ms) {
            Some(left) => left,
            None => {
                let _: () = redis::cmd("PEXPIRE")
                    .arg(&key)
                    .arg(window_ms)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| e.to_string())?;
                window
            }
        };

        Ok(WindowHit { count, resets_in })
    }

    async fn sweep(&self) -> usize {
        // Redis expires keys on its own
        0
    }
}

/// Outcome of a rate-limit check, used to build response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    pub reset_after: Duration,
}

impl Decision {
    /// Whole seconds until the window resets, never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 { secs + 1 } else { secs.max(1) }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, store: Arc<dyn RateLimitStore>) -> Self {
        Self { config, store }
    }

    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(config, Arc::new(MemoryRateLimitStore::new()))
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn client_key(ip: &str, authenticated: bool) -> String {
        format!("{ip}:{}", if authenticated { "auth" } else { "anon" })
    }

    pub async fn check(&self, ip: &str, authenticated: bool) -> Decision {
        let limit = if authenticated {
            self.config.max_authenticated
        } else {
            self.config.max_anonymous
        };
        let key = Self::client_key(ip, authenticated);

        match self.store.hit(&key, self.config.window).await {
            Ok(hit) => Decision {
                allowed: hit.count <= limit,
                limit,
                remaining: limit.saturating_sub(hit.count),
                reset_after: hit.resets_in,
            },
            Err(e) => {
                tracing::warn!(key, "rate limit store unavailable, allowing request: {e}");
                Decision {
                    allowed: true,
                    limit,
                    remaining: limit,
                    reset_after: self.config.window,
                }
            }
        }
    }

    /// Periodically drop expired windows. Runs until the runtime shuts down.
    pub fn spawn_sweeper(&self) {
        let store = self.store.clone();
        let every = self.config.sweep_interval.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = store.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "swept expired rate-limit windows");
                }
            }
        });
    }
}
