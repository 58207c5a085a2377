//! Itinerary mutations with offline fallback.
//!
//! A mutation is sent straight to the server when it is reachable. When it
//! is not, or the request fails in a way a later retry could fix, the change
//! is applied to the snapshot and queued for [`ItineraryCache::sync_pending_actions`].

use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

use super::ItineraryCache;
use crate::{
    error::{Result, WayfarerError},
    models::{ActionKind, Itinerary, MutationOutcome, LOCAL_ID_PREFIX},
};

impl ItineraryCache {
    /// Creates an itinerary.
    ///
    /// Offline, the record is stored in the snapshot under a temporary
    /// `local-` id that is replaced by the server id once the create is
    /// replayed.
    ///
    /// # Errors
    ///
    /// Returns the server error when the request is rejected (401 or another
    /// 4xx), and storage errors when the change cannot be queued.
    pub async fn create_itinerary(&self, payload: Value) -> Result<MutationOutcome> {
        if self.prober.check_connection().await {
            match self.api.create_itinerary(&payload).await {
                Ok(record) => {
                    self.save_itinerary_offline(record.clone()).await;
                    return Ok(MutationOutcome::Applied(Some(record)));
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => warn!("Create failed, queueing for replay: {e}"),
            }
        }

        let local_id = format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4());
        let action = self
            .queue
            .enqueue(ActionKind::Create, &local_id, Some(payload.clone()))
            .await?;

        self.save_itinerary_offline(Itinerary::from_payload(&local_id, &payload))
            .await;
        Ok(MutationOutcome::Queued(action))
    }

    /// Applies `payload` to the itinerary `id`.
    ///
    /// # Errors
    ///
    /// Same as [`ItineraryCache::create_itinerary`].
    pub async fn update_itinerary(&self, id: &str, payload: Value) -> Result<MutationOutcome> {
        validate_id(id)?;

        if !is_local_id(id) && self.prober.check_connection().await {
            match self.api.update_itinerary(id, &payload).await {
                Ok(record) => {
                    self.save_itinerary_offline(record.clone()).await;
                    return Ok(MutationOutcome::Applied(Some(record)));
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => warn!("Update of {id} failed, queueing for replay: {e}"),
            }
        }

        let action = self
            .queue
            .enqueue(ActionKind::Update, id, Some(payload.clone()))
            .await?;
        self.patch_snapshot(id, &payload).await;
        Ok(MutationOutcome::Queued(action))
    }

    /// Deletes the itinerary `id`. A 404 from the server counts as deleted.
    ///
    /// # Errors
    ///
    /// Same as [`ItineraryCache::create_itinerary`].
    pub async fn delete_itinerary(&self, id: &str) -> Result<MutationOutcome> {
        validate_id(id)?;

        if !is_local_id(id) && self.prober.check_connection().await {
            match self.api.delete_itinerary(id).await {
                Ok(()) => {
                    self.remove_itinerary_offline(id).await;
                    return Ok(MutationOutcome::Applied(None));
                }
                Err(e) if e.is_not_found() => {
                    info!("Itinerary {id} was already deleted on the server");
                    self.remove_itinerary_offline(id).await;
                    return Ok(MutationOutcome::Applied(None));
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => warn!("Delete of {id} failed, queueing for replay: {e}"),
            }
        }

        let action = self.queue.enqueue(ActionKind::Delete, id, None).await?;
        self.remove_itinerary_offline(id).await;
        Ok(MutationOutcome::Queued(action))
    }

    async fn patch_snapshot(&self, id: &str, patch: &Value) {
        let current = self
            .get_offline_itineraries()
            .await
            .into_iter()
            .find(|record| record.id() == id);
        if let Some(current) = current {
            self.save_itinerary_offline(current.merged_with(patch)).await;
        }
    }
}

// Records created offline only exist on the server after their create is
// replayed, so changes to them always go through the queue.
fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(WayfarerError::invalid_input("id").with_reason("must not be empty"));
    }
    Ok(())
}
