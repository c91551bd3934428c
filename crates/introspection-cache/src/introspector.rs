//! Read-through introspection: cache first, authorization server on a miss.

use std::sync::Arc;

use async_trait::async_trait;
use introspection_core::{Introspector, Result, TokenIntrospection};
use tracing::{debug, warn};

use crate::cache::TokenCache;
use crate::cache::keys::Redacted;

/// Wraps an [`Introspector`] with a [`TokenCache`].
///
/// Concurrent misses for the same token are not coalesced; each one calls the
/// authorization server, and the last result written wins. Failed calls are
/// never cached.
pub struct CachingIntrospector<I> {
    inner: I,
    cache: TokenCache,
}

impl<I: Introspector> CachingIntrospector<I> {
    /// Creates a caching introspector around `inner`.
    pub fn new(inner: I, cache: TokenCache) -> Self {
        Self { inner, cache }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Returns the cached result or introspects and caches a fresh one.
    pub async fn introspect_cached(&self, token: &str) -> Result<Arc<TokenIntrospection>> {
        if let Some(cached) = self.cache.get(token) {
            return Ok(cached);
        }

        let fresh = match self.inner.introspect(token).await {
            Ok(value) => Arc::new(value),
            Err(e) => {
                warn!(
                    introspector = self.inner.name(),
                    token = %Redacted(token),
                    error = %e,
                    "Token introspection failed"
                );
                return Err(e);
            },
        };

        self.cache.put_shared(token, Arc::clone(&fresh));
        debug!(
            introspector = self.inner.name(),
            active = fresh.is_active(),
            "Token introspection completed, result cached"
        );

        Ok(fresh)
    }

    /// Forgets a token, e.g. on logout.
    pub fn logout(&self, token: &str) {
        self.cache.invalidate(token);
    }
}

#[async_trait]
impl<I: Introspector> Introspector for CachingIntrospector<I> {
    async fn introspect(&self, token: &str) -> Result<TokenIntrospection> {
        let value = self.introspect_cached(token).await?;
        Ok(TokenIntrospection::clone(&value))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
