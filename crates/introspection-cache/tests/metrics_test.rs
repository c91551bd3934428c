//! Counters published through the `metrics` facade.

mod common;

use common::init_tracing;
use introspection_cache::metrics::{EVICTIONS_TOTAL, HITS_TOTAL, MISSES_TOTAL};
use introspection_cache::{CacheSettings, ManualClock, TokenCache};
use std::sync::Arc;
use std::time::Duration;
use introspection_core::TokenIntrospection;
use metrics_exporter_prometheus::PrometheusBuilder;

#[test]
fn test_counters_reach_prometheus() {
    init_tracing();
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let settings = CacheSettings::builder().max_size(1).build().unwrap();
        let cache = TokenCache::new(&settings);

        cache.put("tok-1", TokenIntrospection::active_for("u"));
        cache.get("tok-1");
        cache.get("tok-unknown");
        cache.put("tok-2", TokenIntrospection::active_for("u"));
        cache.put("tok-3", TokenIntrospection::active_for("u"));
        cache.sweep();
    });

    let rendered = handle.render();
    assert!(rendered.contains(HITS_TOTAL));
    assert!(rendered.contains(MISSES_TOTAL));
    assert!(rendered.contains(EVICTIONS_TOTAL));
    assert!(rendered.contains("reason=\"capacity\""));
}

#[test]
fn test_token_past_exp_is_reported_as_expired() {
    init_tracing();
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let clock = ManualClock::new(1_700_000_000);

    let cache = metrics::with_local_recorder(&recorder, || {
        let cache = TokenCache::with_clock(&CacheSettings::default(), Arc::new(clock.clone()));

        cache.put("tok", TokenIntrospection::active_for("u").with_exp(1_700_000_060));
        clock.advance(Duration::from_secs(61));
        assert!(cache.get("tok").is_none());
        cache.sweep();
        cache
    });

    assert_eq!(cache.stats().evictions, 1);

    let rendered = handle.render();
    assert!(rendered.contains("reason=\"expired\""));
    assert!(!rendered.contains("reason=\"explicit\""));
}

#[test]
fn test_stats_snapshot() {
    let cache = TokenCache::new(&CacheSettings::default());

    cache.put("tok", TokenIntrospection::active_for("u"));
    for _ in 0..3 {
        cache.get("tok");
    }
    cache.get("missing");

    let stats = cache.stats();
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate - 0.75).abs() < 0.001);
}
