//! # Introspection Core
//!
//! Domain types shared by the token introspection cache:
//!
//! - [`TokenIntrospection`]: the RFC 7662 response body that gets cached
//! - [`Introspector`]: the trait a client for the authorization server implements
//! - [`IntrospectionError`]: failures reported by an [`Introspector`]

pub mod error;
pub mod introspector;
pub mod response;

// Re-exports
pub use error::{IntrospectionError, Result};
pub use introspector::Introspector;
pub use response::TokenIntrospection;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
