//! Bulk invalidation by claim.

use introspection_core::TokenIntrospection;
use tracing::info;

use crate::cache::TokenCache;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: usize,
}

impl TokenCache {
    /// Invalida todos los tokens cacheados de un subject (p.ej. logout global).
    ///
    /// Works on a snapshot: a token cached concurrently may survive.
    ///
    /// # Examples
    ///
    /// ```
    /// # use introspection_cache::{CacheSettings, TokenCache};
    /// # use introspection_core::TokenIntrospection;
    /// let cache = TokenCache::new(&CacheSettings::default());
    /// cache.put("phone-token", TokenIntrospection::active_for("chef"));
    /// cache.put("laptop-token", TokenIntrospection::active_for("chef"));
    ///
    /// let result = cache.invalidate_subject("chef");
    /// assert_eq!(result.count, 2);
    /// ```
    pub fn invalidate_subject(&self, subject: &str) -> InvalidationResult {
        let result = self.invalidate_matching(|value| value.subject() == Some(subject));

        info!(count = result.count, "Cache entries invalidated for subject");
        result
    }

    /// Invalida todos los tokens emitidos para un client_id.
    pub fn invalidate_client(&self, client_id: &str) -> InvalidationResult {
        let result =
            self.invalidate_matching(|value| value.client_id.as_deref() == Some(client_id));

        info!(
            client_id = %client_id,
            count = result.count,
            "Cache entries invalidated for client"
        );
        result
    }

    /// Invalida las entries cuyo valor cumple el predicado.
    pub fn invalidate_matching<F>(&self, predicate: F) -> InvalidationResult
    where
        F: Fn(&TokenIntrospection) -> bool,
    {
        // Recolectar primero, invalidar despues
        let matching: Vec<_> = self
            .inner
            .iter()
            .filter(|(_, entry)| predicate(entry.value()))
            .map(|(key, _)| key)
            .collect();

        let count = matching.len();
        for key in matching {
            self.inner.invalidate(key.as_ref());
        }

        InvalidationResult { count }
    }
}
