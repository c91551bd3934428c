//! Cache module for the token introspection cache.
//!
//! This module provides the bounded, expiring store using Moka, with a
//! per-entry expiry policy, subject-wide invalidation and metrics.

pub mod entry;
pub mod invalidation;
pub mod keys;
pub mod token_cache;

// Re-exports
pub use entry::CacheEntry;
pub use invalidation::InvalidationResult;
pub use keys::TokenKey;
pub use token_cache::TokenCache;
