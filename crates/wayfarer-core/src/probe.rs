//! Connectivity prober.
//!
//! Answers "is the backend reachable?" without hitting the network on every
//! call: a verdict is reused for the freshness window, after which the next
//! caller triggers a probe of the health endpoint under a short deadline.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use log::{debug, info};
use tokio::time::{self, Instant};

use crate::{
    error::{Result, WayfarerError},
    models::ConnectivityState,
    remote::ItineraryApi,
};

/// Cached online/offline verdict backed by health probes.
pub struct ConnectivityProber {
    api: Arc<dyn ItineraryApi>,
    state: Mutex<ConnectivityState>,
    freshness_window: Duration,
    probe_timeout: Duration,
}

impl ConnectivityProber {
    pub fn new(api: Arc<dyn ItineraryApi>, freshness_window: Duration, probe_timeout: Duration) -> Self {
        Self {
            api,
            state: Mutex::new(ConnectivityState::default()),
            freshness_window,
            probe_timeout,
        }
    }

    /// Returns whether the backend is reachable.
    ///
    /// Never fails: a probe error, timeout or non-success answer is an
    /// offline verdict. The check time is recorded before probing, so
    /// callers arriving while a probe is in flight reuse the previous
    /// verdict instead of probing again.
    pub async fn check_connection(&self) -> bool {
        let now = Instant::now();
        {
            let mut state = self.lock_state();
            if let Some(last) = state.last_checked_at {
                if now.saturating_duration_since(last) < self.freshness_window {
                    return state.is_online;
                }
            }
            state.last_checked_at = Some(now);
        }

        let is_online = match self.probe().await {
            Ok(()) => true,
            Err(e) => {
                debug!("Connectivity probe failed: {e}");
                false
            }
        };

        let mut state = self.lock_state();
        if state.is_online != is_online {
            info!(
                "Connectivity changed: {}",
                if is_online { "online" } else { "offline" }
            );
        }
        state.is_online = is_online;
        is_online
    }

    /// Last verdict, without probing.
    pub fn connection_status(&self) -> bool {
        self.lock_state().is_online
    }

    /// Snapshot of the cached state.
    pub fn state(&self) -> ConnectivityState {
        *self.lock_state()
    }

    async fn probe(&self) -> Result<()> {
        match time::timeout(self.probe_timeout, self.api.health()).await {
            Ok(result) => result,
            Err(_) => Err(WayfarerError::Timeout {
                operation: "connectivity probe".to_string(),
            }),
        }
    }

    // The state holds plain data, so a poisoned lock is still usable.
    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConnectivityState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
