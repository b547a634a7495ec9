//! Periodic purge of expired revocation records.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use eventhub_core::config::AuthConfig;
use eventhub_core::result::AppResult;
use eventhub_database::RevocationStore;

/// Drops revocation records once no token they cover can still verify.
#[derive(Debug, Clone)]
pub struct RevocationSweeper {
    revocations: Arc<dyn RevocationStore>,
    interval: Duration,
}

impl RevocationSweeper {
    /// Sweeper running every `interval`. A zero interval disables it.
    pub fn new(revocations: Arc<dyn RevocationStore>, interval: Duration) -> Self {
        Self {
            revocations,
            interval,
        }
    }

    /// Sweeper using `auth.revocation_sweep_interval_seconds`.
    pub fn from_config(config: &AuthConfig, revocations: Arc<dyn RevocationStore>) -> Self {
        Self::new(
            revocations,
            Duration::from_secs(config.revocation_sweep_interval_seconds),
        )
    }

    /// Run a single purge.
    pub async fn sweep_once(&self) -> AppResult<u64> {
        let purged = self.revocations.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged, "Purged expired revocation records");
        } else {
            debug!("No expired revocation records");
        }
        Ok(purged)
    }

    /// Purge on every tick until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if self.interval.is_zero() {
            info!("Revocation sweeper disabled");
            return;
        }

        info!(
            interval_seconds = self.interval.as_secs(),
            "Revocation sweeper started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        error!(error = %e, "Revocation sweep failed");
                    }
                }
            }
        }

        info!("Revocation sweeper stopped");
    }

    /// Run on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
