//! Cached introspection result plus the metadata the store maintains.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use introspection_core::TokenIntrospection;
use parking_lot::Mutex;

/// Last touch of an entry and the expiry computed at that moment.
#[derive(Debug, Clone, Copy)]
struct Touch {
    at: Instant,
    expiry: Duration,
}

/// A resident cache entry.
///
/// The value is an immutable snapshot. `last_accessed_at` and
/// `computed_expiry` are updated together by the expiry policy on every
/// create, update and read, so they are never observed half-written.
#[derive(Debug)]
pub struct CacheEntry {
    value: Arc<TokenIntrospection>,
    inserted_at: Instant,
    touch: Mutex<Touch>,
    /// Set when a read found the token past its `exp` and removed it.
    expired: AtomicBool,
}

impl CacheEntry {
    /// Creates an entry inserted now. The expiry is filled in by the policy.
    pub fn new(value: Arc<TokenIntrospection>) -> Self {
        let now = Instant::now();
        Self {
            value,
            inserted_at: now,
            touch: Mutex::new(Touch {
                at: now,
                expiry: Duration::ZERO,
            }),
            expired: AtomicBool::new(false),
        }
    }

    /// Returns the cached introspection result.
    pub fn value(&self) -> &Arc<TokenIntrospection> {
        &self.value
    }

    /// When the entry was inserted.
    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    /// When the entry was last created, updated or read.
    pub fn last_accessed_at(&self) -> Instant {
        self.touch.lock().at
    }

    /// Duration from the last touch after which the entry is stale.
    pub fn computed_expiry(&self) -> Duration {
        self.touch.lock().expiry
    }

    /// Instant at which the entry becomes stale.
    pub fn expires_at(&self) -> Instant {
        let touch = *self.touch.lock();
        touch.at + touch.expiry
    }

    /// Returns true if the entry is stale at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        let touch = *self.touch.lock();
        touch.expiry.is_zero() || now >= touch.at + touch.expiry
    }

    /// Records a touch. Called by the expiry policy only.
    pub(crate) fn record_touch(&self, at: Instant, expiry: Duration) {
        *self.touch.lock() = Touch { at, expiry };
    }

    /// Marks the entry as removed because its `exp` passed.
    pub(crate) fn mark_expired(&self) {
        self.expired.store(true, Ordering::Release);
    }

    /// Returns true if the entry was removed because its `exp` passed.
    pub(crate) fn is_marked_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CacheEntry {
        CacheEntry::new(Arc::new(TokenIntrospection::active_for("u1")))
    }

    #[test]
    fn test_new_entry_is_expired_until_touched() {
        let entry = entry();

        assert_eq!(entry.computed_expiry(), Duration::ZERO);
        assert!(entry.is_expired_at(Instant::now()));
        assert_eq!(entry.inserted_at(), entry.last_accessed_at());
    }

    #[test]
    fn test_record_touch() {
        let entry = entry();
        let at = Instant::now();

        entry.record_touch(at, Duration::from_secs(60));

        assert_eq!(entry.last_accessed_at(), at);
        assert_eq!(entry.computed_expiry(), Duration::from_secs(60));
        assert_eq!(entry.expires_at(), at + Duration::from_secs(60));
        assert!(!entry.is_expired_at(at + Duration::from_secs(59)));
        assert!(entry.is_expired_at(at + Duration::from_secs(60)));
    }

    #[test]
    fn test_expired_mark() {
        let entry = entry();
        assert!(!entry.is_marked_expired());

        entry.mark_expired();
        assert!(entry.is_marked_expired());
    }

    #[test]
    fn test_value_is_shared() {
        let value = Arc::new(TokenIntrospection::active_for("chef"));
        let entry = CacheEntry::new(Arc::clone(&value));

        assert!(Arc::ptr_eq(entry.value(), &value));
    }
}
