//! The seam between the cache and the authorization server.

use async_trait::async_trait;

use crate::error::Result;
use crate::response::TokenIntrospection;

/// Something that can ask an authorization server whether a token is active.
///
/// Implementations perform the network call (RFC 7662 `POST /introspect`).
/// They must not cache: caching is layered on top by the cache crate.
#[async_trait]
pub trait Introspector: Send + Sync {
    /// Introspects `token` and returns the parsed response.
    async fn introspect(&self, token: &str) -> Result<TokenIntrospection>;

    /// Returns a name for this introspector (for logging).
    fn name(&self) -> &str {
        "introspector"
    }
}

#[async_trait]
impl<T: Introspector + ?Sized> Introspector for std::sync::Arc<T> {
    async fn introspect(&self, token: &str) -> Result<TokenIntrospection> {
        (**self).introspect(token).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
