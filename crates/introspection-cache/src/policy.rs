//! Per-entry expiry policy.
//!
//! Every create, update and read goes through [`compute_expiry`]:
//!
//! | `active`        | `exp`        | expiry                                  |
//! |-----------------|--------------|-----------------------------------------|
//! | `false` / `null`| ignored      | `inactive_ttl`                          |
//! | `true`          | present      | `min(sliding_ttl, max(0, exp - now))`   |
//! | `true`          | absent       | `sliding_ttl`                           |
//!
//! Each read re-arms the expiry from the same table, so active entries slide
//! but never past the token's own `exp`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use introspection_core::TokenIntrospection;
use moka::Expiry;

use crate::cache::{CacheEntry, TokenKey};
use crate::clock::{Clock, SystemClock};

/// Computes how long an introspection result may be served from its last touch.
///
/// Pure: the result depends only on the arguments. A zero duration means the
/// entry must not be served at all.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use introspection_cache::policy::compute_expiry;
/// use introspection_core::TokenIntrospection;
///
/// let now = 1_700_000_000;
/// let sliding = Duration::from_secs(300);
/// let inactive = Duration::from_secs(30);
///
/// let value = TokenIntrospection::active_for("u1").with_exp(now + 60);
/// assert_eq!(compute_expiry(&value, sliding, inactive, now), Duration::from_secs(60));
///
/// let value = TokenIntrospection::inactive().with_exp(now + 3600);
/// assert_eq!(compute_expiry(&value, sliding, inactive, now), inactive);
/// ```
pub fn compute_expiry(
    value: &TokenIntrospection,
    sliding_ttl: Duration,
    inactive_ttl: Duration,
    now_epoch_seconds: i64,
) -> Duration {
    if !value.is_active() {
        return inactive_ttl;
    }

    match value.exp {
        Some(exp) => {
            let remaining = exp.saturating_sub(now_epoch_seconds);
            if remaining <= 0 {
                Duration::ZERO
            } else {
                sliding_ttl.min(Duration::from_secs(remaining as u64))
            }
        },
        None => sliding_ttl,
    }
}

/// Expiry policy plugged into the store.
#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    sliding_ttl: Duration,
    inactive_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ExpiryPolicy {
    /// Creates a policy backed by the system clock.
    pub fn new(sliding_ttl: Duration, inactive_ttl: Duration) -> Self {
        Self {
            sliding_ttl,
            inactive_ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock used to compare against `exp`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the sliding TTL.
    pub fn sliding_ttl(&self) -> Duration {
        self.sliding_ttl
    }

    /// Returns the TTL applied to inactive results.
    pub fn inactive_ttl(&self) -> Duration {
        self.inactive_ttl
    }

    /// Expiry for `value` as of now.
    pub fn expiry_for(&self, value: &TokenIntrospection) -> Duration {
        compute_expiry(
            value,
            self.sliding_ttl,
            self.inactive_ttl,
            self.clock.now_epoch_seconds(),
        )
    }

    /// Recomputes the expiry of `entry` as of a create, update or read at `at`.
    fn touch(&self, entry: &CacheEntry, at: Instant) -> Duration {
        let expiry = self.expiry_for(entry.value());
        entry.record_touch(at, expiry);
        expiry
    }
}

impl Expiry<TokenKey, Arc<CacheEntry>> for ExpiryPolicy {
    fn expire_after_create(
        &self,
        _key: &TokenKey,
        value: &Arc<CacheEntry>,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(self.touch(value, created_at))
    }

    fn expire_after_read(
        &self,
        _key: &TokenKey,
        value: &Arc<CacheEntry>,
        read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(self.touch(value, read_at))
    }

    fn expire_after_update(
        &self,
        _key: &TokenKey,
        value: &Arc<CacheEntry>,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(self.touch(value, updated_at))
    }
}
