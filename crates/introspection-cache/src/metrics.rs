//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use moka::notification::RemovalCause;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Nombres de las metricas publicadas.
pub const HITS_TOTAL: &str = "introspection_cache_hits_total";
pub const MISSES_TOTAL: &str = "introspection_cache_misses_total";
pub const EVICTIONS_TOTAL: &str = "introspection_cache_evictions_total";
pub const ENTRIES: &str = "introspection_cache_entries";
pub const OPERATION_SECONDS: &str = "introspection_cache_operation_seconds";

static REGISTER: Once = Once::new();

/// Registra las descripciones de las metricas de cache.
/// Safe to call more than once; only the first call has an effect.
pub fn register_cache_metrics() {
    REGISTER.call_once(|| {
        metrics::describe_counter!(HITS_TOTAL, "Total number of token introspection cache hits");
        metrics::describe_counter!(
            MISSES_TOTAL,
            "Total number of token introspection cache misses"
        );
        metrics::describe_counter!(
            EVICTIONS_TOTAL,
            "Total number of entries removed from the token introspection cache"
        );
        metrics::describe_gauge!(ENTRIES, "Current number of cached introspection results");
        metrics::describe_histogram!(OPERATION_SECONDS, "Time spent on cache operations");
    });
}

/// Label for a removal cause.
pub fn removal_reason(cause: RemovalCause) -> &'static str {
    match cause {
        RemovalCause::Expired => "expired",
        RemovalCause::Size => "capacity",
        RemovalCause::Explicit => "explicit",
        RemovalCause::Replaced => "replaced",
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries removed because they expired or to respect capacity.
    pub evictions: u64,
    pub hit_rate: f64,
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos y publica tambien via la facade `metrics`.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!(HITS_TOTAL).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!(MISSES_TOTAL).increment(1);
    }

    /// Registra la salida de una entry del cache
    pub fn record_removal(&self, cause: RemovalCause) {
        if cause.was_evicted() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        counter!(EVICTIONS_TOTAL, "reason" => removal_reason(cause)).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!(ENTRIES).set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!(OPERATION_SECONDS, "operation" => operation).record(duration.as_secs_f64());
    }

    /// Helper para medir tiempo de operacion
    pub fn time_operation<T, F: FnOnce() -> T>(&self, operation: &'static str, f: F) -> T {
        let start = Instant::now();
        let result = f();
        self.record_operation_duration(operation, start.elapsed());
        result
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de evictions (expiradas o por capacidad)
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
            evictions: self.evictions(),
            hit_rate: self.hit_rate(),
        }
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
