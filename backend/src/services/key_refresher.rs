//! Background task for periodic trusted-key refresh.
//!
//! The refresher is the only writer of the key set; request handling only
//! reads it. A failed reload keeps the previous keys in force.

use std::sync::Arc;
use std::time::Duration;

use barista_adapters::{AdapterError, KeySource};
use tokio::time;
use tracing::{error, info, warn};

/// Reloads shorter than this would hammer the key origin for no benefit.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 30;

/// Consecutive failed reloads before the stale key set is reported.
const STALE_AFTER_FAILURES: u32 = 3;

pub struct KeyRefresher {
    keys: Arc<dyn KeySource>,
    refresh_interval: Duration,
}

impl KeyRefresher {
    /// Returns `None` when refreshing is disabled (`interval_secs == 0`).
    pub fn new(keys: Arc<dyn KeySource>, interval_secs: u64) -> Option<Self> {
        if interval_secs == 0 {
            return None;
        }

        let interval_secs = if interval_secs < MIN_REFRESH_INTERVAL_SECS {
            warn!(
                "key refresh interval too short ({}s), using minimum {}s",
                interval_secs, MIN_REFRESH_INTERVAL_SECS
            );
            MIN_REFRESH_INTERVAL_SECS
        } else {
            interval_secs
        };

        Some(Self {
            keys,
            refresh_interval: Duration::from_secs(interval_secs),
        })
    }

    pub fn interval(&self) -> Duration {
        self.refresh_interval
    }

    pub async fn refresh_once(&self) -> Result<usize, AdapterError> {
        match self.keys.refresh().await {
            Ok(count) => {
                info!(source = %self.keys.kind(), keys = count, "trusted keys refreshed");
                Ok(count)
            }
            Err(e) => {
                error!(source = %self.keys.kind(), "key refresh failed, keeping previous keys: {}", e);
                Err(e)
            }
        }
    }

    /// Start the background refresh task
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("starting key refresher with interval: {:?}", self.refresh_interval);

            let mut interval = time::interval(self.refresh_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            // The first tick fires immediately; keys were just loaded.
            interval.tick().await;

            let mut failures = 0;
            loop {
                interval.tick().await;
                self.tick(&mut failures).await;
            }
        })
    }

    /// One scheduled reload. `failures` counts consecutive failed reloads and
    /// is reset by a successful one.
    async fn tick(&self, failures: &mut u32) {
        match self.refresh_once().await {
            Ok(_) => *failures = 0,
            Err(_) => {
                *failures += 1;
                if *failures >= STALE_AFTER_FAILURES {
                    warn!(
                        source = %self.keys.kind(),
                        failures = *failures,
                        "trusted keys are stale, still serving the last good set"
                    );
                }
            }
        }
    }
}
