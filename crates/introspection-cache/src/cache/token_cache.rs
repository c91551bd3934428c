//! Token introspection cache using Moka.

use std::sync::Arc;
use std::time::Instant;

use introspection_core::TokenIntrospection;
use moka::notification::RemovalCause;
use moka::ops::compute::Op;
use moka::sync::Cache;
use tracing::{debug, trace};

use crate::cache::entry::CacheEntry;
use crate::cache::keys::{Redacted, TokenKey};
use crate::clock::{Clock, SystemClock};
use crate::metrics::{CacheMetrics, CacheStats, register_cache_metrics, removal_reason};
use crate::policy::ExpiryPolicy;
use crate::settings::CacheSettings;

/// Cache de resultados de introspection usando Moka.
/// Thread-safe; clones share the same storage and counters.
///
/// The cache never talks to the authorization server. On a miss the caller
/// introspects the token itself and stores the result with [`put`](Self::put).
///
/// # Examples
///
/// ```
/// use introspection_cache::{CacheSettings, TokenCache};
/// use introspection_core::TokenIntrospection;
///
/// let cache = TokenCache::new(&CacheSettings::default());
///
/// assert!(cache.get("bearer-token").is_none());
/// cache.put("bearer-token", TokenIntrospection::active_for("user-1"));
///
/// let cached = cache.get("bearer-token").unwrap();
/// assert_eq!(cached.subject(), Some("user-1"));
/// ```
#[derive(Clone)]
pub struct TokenCache {
    pub(crate) inner: Cache<TokenKey, Arc<CacheEntry>>,
    policy: ExpiryPolicy,
    max_size: u64,
    metrics: CacheMetrics,
}

impl TokenCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(settings: &CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Creates a cache whose `exp` comparisons use the given wall clock.
    pub fn with_clock(settings: &CacheSettings, clock: Arc<dyn Clock>) -> Self {
        register_cache_metrics();

        let metrics = CacheMetrics::new();
        let policy =
            ExpiryPolicy::new(settings.sliding_ttl, settings.inactive_ttl).with_clock(clock);

        // Listener para evictions
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .name("token-introspection")
            .max_capacity(settings.max_size)
            .expire_after(policy.clone())
            .eviction_listener(move |key: Arc<TokenKey>, entry: Arc<CacheEntry>, cause| {
                // Las entries vencidas por exp se quitan a mano pero cuentan como expired
                let cause = match cause {
                    RemovalCause::Explicit if entry.is_marked_expired() => RemovalCause::Expired,
                    other => other,
                };
                trace!(token = %key, reason = removal_reason(cause), "Cache entry removed");
                eviction_metrics.record_removal(cause);
            })
            .build();

        Self {
            inner,
            policy,
            max_size: settings.max_size,
            metrics,
        }
    }

    /// Returns the cached result for `token` if it has not expired.
    ///
    /// A hit re-arms the entry's expiry. A miss and an entry that expired but
    /// has not been swept yet both return `None`.
    pub fn get(&self, token: &str) -> Option<Arc<TokenIntrospection>> {
        self.get_entry(token).map(|entry| Arc::clone(entry.value()))
    }

    /// Like [`get`](Self::get), but returns the entry with its metadata.
    pub fn get_entry(&self, token: &str) -> Option<Arc<CacheEntry>> {
        let start = Instant::now();
        let found = self.inner.get(token);

        // Un token activo nunca se sirve pasado su exp, aunque el timer no haya corrido
        let result = match found {
            Some(entry) if self.policy.expiry_for(entry.value()).is_zero() => {
                self.remove_expired(token, &entry);
                None
            },
            other => other,
        };

        if result.is_some() {
            self.metrics.record_hit();
            debug!(token = %Redacted(token), "Token introspection cache hit");
        } else {
            self.metrics.record_miss();
            debug!(token = %Redacted(token), "Token introspection cache miss");
        }

        self.metrics.record_operation_duration("get", start.elapsed());
        result
    }

    /// Inserta o reemplaza el resultado para `token`.
    ///
    /// A result that is already expired is stored but never returned, and the
    /// next sweep removes it.
    pub fn put(&self, token: impl Into<String>, value: TokenIntrospection) {
        self.put_shared(token, Arc::new(value));
    }

    /// Like [`put`](Self::put), for a result the caller also keeps.
    pub fn put_shared(&self, token: impl Into<String>, value: Arc<TokenIntrospection>) {
        let key = TokenKey::new(token);

        debug!(
            token = %key,
            active = value.is_active(),
            expiry = ?self.policy.expiry_for(&value),
            "Caching token introspection result"
        );

        let entry = Arc::new(CacheEntry::new(value));
        self.metrics
            .time_operation("put", || self.inner.insert(key, entry));
        self.update_entry_gauge();
    }

    /// Invalida una entrada especifica (p.ej. logout).
    pub fn invalidate(&self, token: &str) {
        self.inner.invalidate(token);
        debug!(token = %Redacted(token), "Token introspection cache entry invalidated");
    }

    /// Invalida todas las entradas.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        debug!("All token introspection cache entries invalidated");
    }

    /// Runs pending housekeeping, then returns the number of resident entries.
    pub fn size(&self) -> u64 {
        self.sweep()
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn estimated_size(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Removes expired entries and enforces the capacity bound.
    ///
    /// Returns the number of entries still resident. This also happens
    /// amortized inside regular operations; calling it is never required for
    /// correctness.
    pub fn sweep(&self) -> u64 {
        self.metrics
            .time_operation("sweep", || self.inner.run_pending_tasks());
        self.update_entry_gauge();
        self.inner.entry_count()
    }

    /// Returns the configured maximum number of entries.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Returns the expiry policy in use.
    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Snapshot of hit, miss and eviction counts.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }

    /// Removes `stale` only if it is still the resident value for `token`.
    ///
    /// A value another thread put after the read is left alone.
    fn remove_expired(&self, token: &str, stale: &Arc<CacheEntry>) {
        let key = TokenKey::new(token);
        let _ = self
            .inner
            .entry_by_ref(&key)
            .and_compute_with(|current| match current {
                Some(current) if Arc::ptr_eq(current.value(), stale) => {
                    stale.mark_expired();
                    Op::Remove
                },
                _ => Op::Nop,
            });

        trace!(token = %key, "Token past exp removed on read");
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }
}
