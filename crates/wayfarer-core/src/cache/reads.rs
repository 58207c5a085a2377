//! Network-first reads and direct snapshot access.

use log::{debug, error, warn};
use serde_json::Value;

use super::ItineraryCache;
use crate::{
    error::Result,
    models::{CacheInfo, Itinerary, ItineraryFilter, LoadOutcome, Notice},
    params::ListItineraries,
    remote::{normalize_list_response, ItineraryPage},
};

impl ItineraryCache {
    /// Loads the itinerary list, preferring the network.
    ///
    /// Online, the fetched list replaces the snapshot and is returned. When
    /// the backend is unreachable the snapshot is returned. When the fetch
    /// fails the snapshot is returned too, with a [`Notice`] telling the
    /// screen whether it is showing stale data or nothing at all. A 401 is
    /// left to the session layer and produces no notice.
    pub async fn load_itineraries(&self, params: &ListItineraries) -> LoadOutcome {
        let _guard = self.load_guard.lock().await;

        if !self.prober.check_connection().await {
            debug!("Offline, serving itineraries from the snapshot");
            return LoadOutcome::cached(self.get_offline_itineraries().await, None);
        }

        match self.fetch_page(params).await {
            Ok(page) => {
                if let Err(e) = self.snapshot.save(&page.itineraries).await {
                    warn!("Failed to save itineraries offline: {e}");
                }
                LoadOutcome::network(page.itineraries, page.pagination)
            }
            Err(e) if e.is_unauthorized() => {
                debug!("Itinerary fetch unauthorized, serving the snapshot");
                LoadOutcome::cached(self.get_offline_itineraries().await, None)
            }
            Err(e) => {
                error!("Failed to load itineraries: {e}");
                let cached = self.get_offline_itineraries().await;
                let notice = if cached.is_empty() {
                    Notice::LoadFailed
                } else {
                    Notice::ShowingCached
                };
                LoadOutcome::cached(cached, Some(notice))
            }
        }
    }

    async fn fetch_page(&self, params: &ListItineraries) -> Result<ItineraryPage> {
        let body = self.api.list_itineraries(params).await?;
        Ok(normalize_list_response(body))
    }

    /// Replaces the snapshot with `records`.
    ///
    /// Anything other than a JSON array of objects is logged and ignored,
    /// leaving the previous snapshot in place.
    pub async fn save_itineraries_offline(&self, records: &Value) {
        if let Err(e) = self.snapshot.save_value(records).await {
            error!("Failed to save itineraries offline: {e}");
        }
    }

    /// The snapshot, or an empty list when it is absent or unreadable.
    pub async fn get_offline_itineraries(&self) -> Vec<Itinerary> {
        match self.snapshot.load().await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to read offline itineraries: {e}");
                Vec::new()
            }
        }
    }

    /// Replaces the snapshot entry with the same id, or appends `record`.
    pub async fn save_itinerary_offline(&self, record: Itinerary) {
        let id = record.id().to_string();
        if let Err(e) = self.snapshot.upsert(record).await {
            error!("Failed to save itinerary {id} offline: {e}");
        }
    }

    /// Drops the snapshot entry with `id`, if any.
    pub async fn remove_itinerary_offline(&self, id: &str) {
        if let Err(e) = self.snapshot.remove(id).await {
            error!("Failed to remove itinerary {id} from the snapshot: {e}");
        }
    }

    /// Snapshot entries matching `filter`, in the filter's sort order.
    pub async fn filtered_itineraries(&self, filter: &ItineraryFilter) -> Vec<Itinerary> {
        filter.apply(&self.get_offline_itineraries().await)
    }

    /// Snapshot size, queue length and a fresh connectivity verdict.
    pub async fn get_cache_info(&self) -> CacheInfo {
        let itineraries_count = self.get_offline_itineraries().await.len();
        let pending_sync_count = self.get_pending_sync().await.len();
        let is_online = self.prober.check_connection().await;

        CacheInfo {
            itineraries_count,
            pending_sync_count,
            is_online,
        }
    }

    /// Deletes the snapshot and the pending queue.
    ///
    /// Queued changes that were never replayed are lost.
    pub async fn clear_offline_cache(&self) {
        if let Err(e) = self.snapshot.clear().await {
            error!("Failed to clear the itinerary snapshot: {e}");
        }
        if let Err(e) = self.queue.clear().await {
            error!("Failed to clear the pending queue: {e}");
        }
        debug!("Offline cache cleared");
    }
}
