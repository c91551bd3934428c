//! # Introspection Cache
//!
//! Bounded, expiring, concurrent cache for OAuth2 token introspection
//! results (RFC 7662).
//!
//! ## Features
//!
//! - Sliding TTL for active tokens, capped by the token's own `exp` claim
//! - Short fixed TTL for inactive tokens, so revoked tokens don't hammer the
//!   authorization server and newly valid ones are re-checked promptly
//! - Capacity bound with amortized housekeeping (Moka)
//! - Hit, miss and eviction counters published through `metrics`
//! - Optional background sweeper and a read-through [`CachingIntrospector`]
//!
//! ## Example
//!
//! ```
//! use introspection_cache::{CacheSettings, TokenCache};
//! use introspection_core::TokenIntrospection;
//!
//! let cache = TokenCache::new(&CacheSettings::default());
//!
//! let token = "opaque-bearer-token";
//! let result = match cache.get(token) {
//!     Some(cached) => cached,
//!     None => {
//!         // Aqui iria la llamada real al authorization server
//!         let fresh = TokenIntrospection::active_for("user-1");
//!         cache.put(token, fresh.clone());
//!         std::sync::Arc::new(fresh)
//!     }
//! };
//!
//! assert!(result.is_active());
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod introspector;
pub mod metrics;
pub mod policy;
pub mod settings;
pub mod sweeper;

// Re-exports
pub use cache::{CacheEntry, InvalidationResult, TokenCache, TokenKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SettingsError;
pub use introspector::CachingIntrospector;
pub use metrics::{CacheMetrics, CacheStats};
pub use policy::{ExpiryPolicy, compute_expiry};
pub use settings::{CacheSettings, CacheSettingsBuilder};
pub use sweeper::{SweepHandle, SweepScheduler};

// Re-export introspection_core for consumers
pub use introspection_core;
