//! Cache settings.
//!
//! Settings are layered: built-in defaults, then an optional file, then
//! environment variables prefixed with `INTROSPECTION_CACHE_`.
//!
//! ```toml
//! sliding_ttl = "5m"
//! max_size = 10000
//! inactive_ttl = "30s"
//! sweep_interval = "1m"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Prefix for environment overrides, e.g. `INTROSPECTION_CACHE_MAX_SIZE=500`.
pub const ENV_PREFIX: &str = "INTROSPECTION_CACHE";

/// Configuracion del cache de introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// TTL deslizante para tokens activos (default: 5 minutos).
    #[serde(default = "default_sliding_ttl", with = "humantime_serde")]
    pub sliding_ttl: Duration,

    /// Maximo numero de entries (default: 10000).
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// TTL fijo para tokens inactivos (default: 30 segundos).
    #[serde(default = "default_inactive_ttl", with = "humantime_serde")]
    pub inactive_ttl: Duration,

    /// Intervalo del sweeper en background (opcional).
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub sweep_interval: Option<Duration>,
}

fn default_sliding_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_max_size() -> u64 {
    10_000
}

fn default_inactive_ttl() -> Duration {
    Duration::from_secs(30)
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            sliding_ttl: default_sliding_ttl(),
            max_size: default_max_size(),
            inactive_ttl: default_inactive_ttl(),
            sweep_interval: None,
        }
    }
}

impl CacheSettings {
    /// Creates a new builder starting from the defaults.
    pub fn builder() -> CacheSettingsBuilder {
        CacheSettingsBuilder::default()
    }

    /// Loads settings from an optional file and the process environment.
    ///
    /// The file format is inferred from its extension (toml, yaml, json, ...).
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_from(
        path: Option<&Path>,
        environment: Environment,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: CacheSettings = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        tracing::debug!(
            sliding_ttl = ?settings.sliding_ttl,
            max_size = settings.max_size,
            inactive_ttl = ?settings.inactive_ttl,
            "Cache settings loaded"
        );

        Ok(settings)
    }

    /// Checks the settings for values the cache cannot work with.
    ///
    /// A zero `inactive_ttl` is allowed and means inactive results are never
    /// served from the cache.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_size == 0 {
            return Err(SettingsError::invalid(
                "max_size",
                "must be greater than zero",
            ));
        }
        if self.sliding_ttl.is_zero() {
            return Err(SettingsError::invalid(
                "sliding_ttl",
                "must be greater than zero",
            ));
        }
        if self.sweep_interval.is_some_and(|d| d.is_zero()) {
            return Err(SettingsError::invalid(
                "sweep_interval",
                "must be greater than zero when set",
            ));
        }
        Ok(())
    }
}

/// Builder for CacheSettings.
#[derive(Debug, Default)]
pub struct CacheSettingsBuilder {
    settings: CacheSettings,
}

impl CacheSettingsBuilder {
    /// Sets the sliding TTL for active tokens.
    pub fn sliding_ttl(mut self, ttl: Duration) -> Self {
        self.settings.sliding_ttl = ttl;
        self
    }

    /// Sets the maximum number of entries.
    pub fn max_size(mut self, max_size: u64) -> Self {
        self.settings.max_size = max_size;
        self
    }

    /// Sets the fixed TTL for inactive tokens.
    pub fn inactive_ttl(mut self, ttl: Duration) -> Self {
        self.settings.inactive_ttl = ttl;
        self
    }

    /// Sets the background sweep interval.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.settings.sweep_interval = Some(interval);
        self
    }

    /// Builds and validates the settings.
    pub fn build(self) -> Result<CacheSettings, SettingsError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
