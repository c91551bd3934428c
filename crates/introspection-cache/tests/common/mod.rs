//! Test helpers para introspection-cache.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use introspection_cache::{CacheSettings, TokenCache};
use introspection_core::{IntrospectionError, Introspector, Result, TokenIntrospection};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Settings with the given sliding and inactive TTLs.
pub fn settings(sliding: Duration, inactive: Duration) -> CacheSettings {
    CacheSettings::builder()
        .sliding_ttl(sliding)
        .inactive_ttl(inactive)
        .build()
        .expect("valid test settings")
}

/// Cache with production defaults (5m / 10000 / 30s).
pub fn default_cache() -> TokenCache {
    init_tracing();
    TokenCache::new(&CacheSettings::default())
}

/// A random opaque token.
pub fn random_token() -> String {
    format!("tok-{}", uuid::Uuid::now_v7())
}

/// Introspector en memoria que cuenta las llamadas.
///
/// Tokens starting with `active-` are active for the rest of the string,
/// `fail` returns an error, anything else is inactive.
#[derive(Default)]
pub struct CountingIntrospector {
    calls: AtomicU32,
    exp: Option<i64>,
}

impl CountingIntrospector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every active result carries this `exp`.
    pub fn with_exp(exp: i64) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            exp: Some(exp),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Introspector for CountingIntrospector {
    async fn introspect(&self, token: &str) -> Result<TokenIntrospection> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if token == "fail" {
            return Err(IntrospectionError::unavailable("authorization server down"));
        }

        match token.strip_prefix("active-") {
            Some(subject) => {
                let mut value = TokenIntrospection::active_for(subject);
                value.exp = self.exp;
                Ok(value)
            },
            None => Ok(TokenIntrospection::inactive()),
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}
