//! Background expiry sweeper.
//!
//! Housekeeping already runs amortized inside cache operations. The sweeper
//! only matters for caches that go quiet: it keeps memory and the entries
//! gauge honest when no requests arrive.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::cache::TokenCache;

/// Handle for controlling a running sweeper.
pub struct SweepHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
}

impl SweepHandle {
    /// Signals the sweeper to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodically runs [`TokenCache::sweep`] on a tokio task.
pub struct SweepScheduler {
    cache: TokenCache,
    interval: Duration,
}

impl SweepScheduler {
    /// Creates a new sweeper for the given cache.
    pub fn new(cache: TokenCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// Starts the background task. Must be called within a tokio runtime.
    ///
    /// Returns a handle; dropping it stops the sweeper.
    pub fn start(self) -> SweepHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = SweepHandle { shutdown_tx };

        tokio::spawn(self.run(shutdown_rx));

        handle
    }

    /// Runs the sweep loop.
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting cache sweeper with interval {:?}", self.interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    let resident = self.cache.sweep();
                    debug!(resident = resident, "Cache sweep completed");
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Cache sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheSettings;
    use introspection_core::TokenIntrospection;

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let cache = TokenCache::new(&CacheSettings::default());
        cache.put("expired", TokenIntrospection::active_for("u").with_exp(1));
        cache.put("live", TokenIntrospection::active_for("u"));

        let handle = SweepScheduler::new(cache.clone(), Duration::from_millis(100)).start();

        // El timer wheel de Moka avanza en ticks de ~1s; dejar varios ticks de margen
        tokio::time::sleep(Duration::from_millis(3000)).await;

        assert!(cache.get("expired").is_none());
        assert!(cache.get("live").is_some());
        assert_eq!(cache.estimated_size(), 1);
        assert!(cache.stats().evictions >= 1);
        handle.stop();
    }
}
