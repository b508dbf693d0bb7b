//! Fixed-window counters and the decisions built on them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_backend::config::RateLimitConfig;
use folio_backend::rate_limit::{Decision, MemoryRateLimitStore, RateLimiter, remaining_ttl};

fn config(max_anonymous: u64, max_authenticated: u64) -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        window: Duration::from_secs(60),
        max_anonymous,
        max_authenticated,
        sweep_interval: Duration::from_secs(60),
        trust_proxy: false,
    }
}

#[test]
fn test_window_counts_then_resets() {
    let store = MemoryRateLimitStore::new();
    let window = Duration::from_secs(10);
    let start = Instant::now();

    assert_eq!(store.hit_at("k", window, start).count, 1);
    assert_eq!(store.hit_at("k", window, start + Duration::from_secs(3)).count, 2);
    let third = store.hit_at("k", window, start + Duration::from_secs(4));
    assert_eq!(third.count, 3);
    assert_eq!(third.resets_in, Duration::from_secs(6));

    let after = store.hit_at("k", window, start + Duration::from_secs(10));
    assert_eq!(after.count, 1, "counter resets once the window elapses");
}

#[test]
fn test_keys_are_independent() {
    let store = MemoryRateLimitStore::new();
    let window = Duration::from_secs(10);
    let now = Instant::now();

    store.hit_at("1.2.3.4:anon", window, now);
    store.hit_at("1.2.3.4:anon", window, now);
    assert_eq!(store.hit_at("1.2.3.4:auth", window, now).count, 1);
    assert_eq!(store.hit_at("5.6.7.8:anon", window, now).count, 1);
}

#[test]
fn test_sweep_drops_only_expired_windows() {
    let store = MemoryRateLimitStore::new();
    let now = Instant::now();
    store.hit_at("old", Duration::from_secs(1), now);
    store.hit_at("fresh", Duration::from_secs(60), now);

    assert_eq!(store.sweep_at(now + Duration::from_secs(2)), 1);
    assert_eq!(store.tracked_keys(), 1);
}

#[test]
fn test_client_key_separates_auth_state() {
    assert_eq!(RateLimiter::client_key("10.0.0.1", true), "10.0.0.1:auth");
    assert_eq!(RateLimiter::client_key("10.0.0.1", false), "10.0.0.1:anon");
}

#[test]
fn test_retry_after_rounds_up_and_is_never_zero() {
    let decision = |reset_after| Decision {
        allowed: false,
        limit: 1,
        remaining: 0,
        reset_after,
    };
    assert_eq!(decision(Duration::from_millis(1500)).retry_after_secs(), 2);
    assert_eq!(decision(Duration::from_secs(3)).retry_after_secs(), 3);
    assert_eq!(decision(Duration::ZERO).retry_after_secs(), 1);
}

#[tokio::test]
async fn test_n_plus_first_request_is_refused() {
    let limiter = RateLimiter::new(config(3, 5), Arc::new(MemoryRateLimitStore::new()));

    for expected_remaining in [2, 1, 0] {
        let d = limiter.check("9.9.9.9", false).await;
        assert!(d.allowed);
        assert_eq!(d.remaining, expected_remaining);
    }
    let refused = limiter.check("9.9.9.9", false).await;
    assert!(!refused.allowed);
    assert_eq!(refused.limit, 3);
    assert!(refused.retry_after_secs() >= 1);

    // Authenticated traffic from the same IP has its own, larger budget.
    let authed = limiter.check("9.9.9.9", true).await;
    assert!(authed.allowed);
    assert_eq!(authed.limit, 5);
}

#[test]
fn test_counter_without_expiry_gets_one_set() {
    assert_eq!(remaining_ttl(-1), None);
    assert_eq!(remaining_ttl(0), None);
    assert_eq!(remaining_ttl(-2), None);
    assert_eq!(remaining_ttl(1500), Some(Duration::from_millis(1500)));
}
