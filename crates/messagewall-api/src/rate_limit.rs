use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use messagewall_types::models::Identity;

/// Minimum gap between two accepted posts from one identity.
pub const POST_INTERVAL: Duration = Duration::from_secs(5);

/// Per-identity post cooldown.
///
/// Remembers when each identity last got past the check. Entries are never
/// evicted and live only as long as the process.
pub struct RateLimiter {
    interval_ms: i64,
    last_post: Mutex<HashMap<Identity, i64>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(POST_INTERVAL)
    }
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: i64::try_from(interval.as_millis()).unwrap_or(i64::MAX),
            last_post: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` and records `now_ms` if `identity` is outside its
    /// cooldown. Returns `false` and leaves the record untouched otherwise.
    ///
    /// The record is written as soon as the check passes, whatever happens
    /// to the request afterwards.
    pub fn try_acquire(&self, identity: &Identity, now_ms: i64) -> bool {
        // Inserts are the only writes, so a poisoned map is still consistent
        let mut last_post = self.last_post.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(&last) = last_post.get(identity) {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }

        last_post.insert(identity.clone(), now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s)
    }

    #[test]
    fn first_post_is_always_allowed() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 0));
        assert_eq!(limiter.last_post.lock().unwrap().len(), 1);
    }

    #[test]
    fn rejected_post_is_not_recorded() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 1_000));
        assert!(!limiter.try_acquire(&id("a"), 2_000));
        assert_eq!(limiter.last_post.lock().unwrap().get(&id("a")), Some(&1_000));
    }

    #[test]
    fn second_post_inside_window_is_rejected() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 1_000));
        assert!(!limiter.try_acquire(&id("a"), 1_001));
        assert!(!limiter.try_acquire(&id("a"), 5_999));
    }

    #[test]
    fn post_at_exactly_the_interval_is_allowed() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 1_000));
        assert!(limiter.try_acquire(&id("a"), 6_000));
    }

    #[test]
    fn rejection_does_not_extend_the_window() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 0));
        assert!(!limiter.try_acquire(&id("a"), 4_000));
        // Measured from the last accepted post, not the rejected one
        assert!(limiter.try_acquire(&id("a"), 5_000));
    }

    #[test]
    fn identities_are_independent() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(&id("a"), 0));
        assert!(limiter.try_acquire(&id("b"), 1));
        assert!(!limiter.try_acquire(&id("a"), 2));
    }

    #[test]
    fn custom_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        assert!(limiter.try_acquire(&id("a"), 0));
        assert!(!limiter.try_acquire(&id("a"), 99));
        assert!(limiter.try_acquire(&id("a"), 100));
    }
}
