//! Reconciliation orchestrator for cached itineraries.
//!
//! [`ItineraryCache`] is the single entry point screens and interfaces use.
//! It owns the connectivity prober, the snapshot store and the pending
//! queue, and decides per read whether data comes from the network or from
//! the last saved snapshot.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  ItineraryCache │    │    Snapshot /   │    │  KeyValueStore  │
//! │ (reads, sync,   │───▶│  PendingQueue   │───▶│ (SQLite/memory) │
//! │  mutations)     │    │                 │    │                 │
//! └────────┬────────┘    └─────────────────┘    └─────────────────┘
//!          │             ┌─────────────────┐    ┌─────────────────┐
//!          └────────────▶│ConnectivityProbe│───▶│  ItineraryApi   │
//!                        └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory wiring storage, API client and timings together
//! - [`reads`]: Network-first list reads and snapshot accessors
//! - [`mutations`]: Create, update and delete with offline fallback
//! - [`sync`]: Replay of queued actions and the auto-sync loop
//!
//! ## Failure semantics
//!
//! The methods in this module never return errors for reads, snapshot
//! access or sync: storage and network failures are logged and replaced by
//! an empty list, `false`, zero counts or a report. Mutations return a
//! [`crate::error::Result`] because the caller must learn when a change was
//! rejected outright.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use wayfarer_core::{CacheConfig, ItineraryCacheBuilder, params::ListItineraries};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = ItineraryCacheBuilder::new()
//!     .with_config(CacheConfig::new("https://trips.example.com/api"))
//!     .build()
//!     .await?;
//!
//! let outcome = cache.load_itineraries(&ListItineraries::default()).await;
//! println!("{} itineraries from {:?}", outcome.itineraries.len(), outcome.source);
//!
//! let report = cache.sync_pending_actions().await;
//! println!("synced {} of {}", report.synced, report.attempted);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;

pub mod builder;
pub mod mutations;
pub mod reads;
pub mod sync;

pub use builder::ItineraryCacheBuilder;

use crate::{
    config::CacheConfig,
    probe::ConnectivityProber,
    queue::PendingQueue,
    remote::ItineraryApi,
    snapshot::SnapshotStore,
    storage::KeyValueStore,
};

/// Offline-capable access to the user's itineraries.
pub struct ItineraryCache {
    pub(crate) api: Arc<dyn ItineraryApi>,
    pub(crate) prober: ConnectivityProber,
    pub(crate) snapshot: SnapshotStore,
    pub(crate) queue: PendingQueue,
    // One list read at a time, so a slow response cannot overwrite the
    // snapshot saved by a newer one.
    pub(crate) load_guard: Mutex<()>,
    // Replays never overlap; a second sync waits and sees the shortened queue.
    pub(crate) sync_guard: Mutex<()>,
}

impl ItineraryCache {
    pub(crate) fn new(
        api: Arc<dyn ItineraryApi>,
        store: Arc<dyn KeyValueStore>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            prober: ConnectivityProber::new(
                api.clone(),
                config.freshness_window,
                config.probe_timeout,
            ),
            api,
            snapshot: SnapshotStore::new(store.clone()),
            queue: PendingQueue::new(store),
            load_guard: Mutex::new(()),
            sync_guard: Mutex::new(()),
        }
    }

    /// Returns whether the backend is reachable, probing it when the last
    /// verdict is older than the freshness window.
    pub async fn check_connection(&self) -> bool {
        self.prober.check_connection().await
    }

    /// Last connectivity verdict, without probing.
    pub fn connection_status(&self) -> bool {
        self.prober.connection_status()
    }
}
