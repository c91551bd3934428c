//! Error types for the cache crate.
//!
//! Cache operations themselves never fail: capacity pressure is handled by
//! eviction. Errors only arise while loading or validating settings.

use thiserror::Error;

/// Errors produced while building [`CacheSettings`](crate::CacheSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings could not be read or deserialized.
    #[error("failed to load cache settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting has a value the cache cannot work with.
    #[error("invalid cache setting '{field}': {reason}")]
    Invalid {
        /// Name of the offending setting
        field: &'static str,
        /// Why it's invalid
        reason: String,
    },
}

impl SettingsError {
    /// Creates an Invalid error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}
