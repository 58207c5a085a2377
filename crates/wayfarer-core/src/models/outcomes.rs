//! Result types returned by the cache facade.

use serde::{Deserialize, Serialize};

use super::{itinerary::Itinerary, itinerary::Pagination, pending::PendingAction};

/// Last connectivity verdict and when it was computed.
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityState {
    pub is_online: bool,
    /// `None` until the first probe completes
    pub last_checked_at: Option<tokio::time::Instant>,
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self {
            is_online: true,
            last_checked_at: None,
        }
    }
}

/// Composite used to drive offline banners and pending-change badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub itineraries_count: usize,
    pub pending_sync_count: usize,
    pub is_online: bool,
}

/// Where the itineraries of a read came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Network,
    Cache,
}

/// Soft notification the UI should show after a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The fetch failed but the last known itineraries are shown
    ShowingCached,
    /// The fetch failed and there is nothing cached to show
    LoadFailed,
}

/// Outcome of [`crate::ItineraryCache::load_itineraries`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub itineraries: Vec<Itinerary>,
    pub source: DataSource,
    pub notice: Option<Notice>,
    /// Present when the server answered with an envelope response
    pub pagination: Option<Pagination>,
}

impl LoadOutcome {
    pub(crate) fn network(itineraries: Vec<Itinerary>, pagination: Option<Pagination>) -> Self {
        Self {
            itineraries,
            source: DataSource::Network,
            notice: None,
            pagination,
        }
    }

    pub(crate) fn cached(itineraries: Vec<Itinerary>, notice: Option<Notice>) -> Self {
        Self {
            itineraries,
            source: DataSource::Cache,
            notice,
            pagination: None,
        }
    }
}

/// Summary of one [`crate::ItineraryCache::sync_pending_actions`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Sync was deferred because the backend is unreachable
    pub skipped_offline: bool,
    pub attempted: usize,
    pub synced: usize,
    /// Ids of the actions that remain queued
    pub failed: Vec<String>,
}

/// What happened to a mutation submitted through the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The server confirmed the change; carries the server record when the
    /// endpoint returns one
    Applied(Option<Itinerary>),
    /// The change was recorded for later replay
    Queued(PendingAction),
}

impl MutationOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, MutationOutcome::Queued(_))
    }
}
