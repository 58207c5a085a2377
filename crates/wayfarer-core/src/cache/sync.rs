//! Pending-action access and replay.

use std::{collections::HashMap, future::Future, time::Duration};

use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::time::{self, MissedTickBehavior};

use super::ItineraryCache;
use crate::{
    error::{Result, WayfarerError},
    models::{ActionKind, CacheInfo, PendingAction, SyncReport, LOCAL_ID_PREFIX},
};

const MIN_AUTO_SYNC_PERIOD: Duration = Duration::from_secs(1);

impl ItineraryCache {
    /// Queues a mutation for later replay. Returns `None` when it could not
    /// be stored.
    pub async fn add_pending_sync(
        &self,
        kind: ActionKind,
        record_id: &str,
        payload: Option<Value>,
    ) -> Option<PendingAction> {
        match self.queue.enqueue(kind, record_id, payload).await {
            Ok(action) => Some(action),
            Err(e) => {
                error!("Failed to queue {} of {record_id}: {e}", kind.as_str());
                None
            }
        }
    }

    /// Queued actions, oldest first. Empty when the queue is unreadable.
    pub async fn get_pending_sync(&self) -> Vec<PendingAction> {
        match self.queue.list().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Failed to read pending actions: {e}");
                Vec::new()
            }
        }
    }

    /// Drops the queued action `action_id`. Returns whether it was queued.
    pub async fn remove_pending_sync(&self, action_id: &str) -> bool {
        match self.queue.remove(action_id).await {
            Ok(removed) => removed,
            Err(e) => {
                error!("Failed to remove pending action {action_id}: {e}");
                false
            }
        }
    }

    /// Replays queued actions against the server in the order they were
    /// queued.
    ///
    /// Nothing is attempted while offline. Each action that succeeds is
    /// removed from the queue and its result written to the snapshot; one
    /// that fails stays queued for the next run. A 401 stops the run since
    /// every later request would be rejected too.
    pub async fn sync_pending_actions(&self) -> SyncReport {
        let _guard = self.sync_guard.lock().await;

        if !self.prober.check_connection().await {
            debug!("Offline, deferring sync of pending actions");
            return SyncReport {
                skipped_offline: true,
                ..SyncReport::default()
            };
        }

        let pending = self.get_pending_sync().await;
        let mut report = SyncReport::default();
        // Server ids assigned to records created offline during this run.
        let mut assigned_ids: HashMap<String, String> = HashMap::new();

        let mut remaining = pending.into_iter();
        while let Some(mut action) = remaining.next() {
            if let Some(server_id) = assigned_ids.get(&action.record_id) {
                action.record_id = server_id.clone();
            }

            report.attempted += 1;
            match self.replay(&action).await {
                Ok(assigned) => {
                    if let Some(server_id) = assigned {
                        assigned_ids.insert(action.record_id.clone(), server_id);
                    }
                    if !self.remove_pending_sync(&action.id).await {
                        warn!("Replayed action {} was not found in the queue", action.id);
                    }
                    report.synced += 1;
                }
                Err(e) if e.is_unauthorized() => {
                    warn!("Sync stopped, session rejected: {e}");
                    report.failed.push(action.id);
                    report.failed.extend(remaining.by_ref().map(|action| action.id));
                    break;
                }
                Err(e) => {
                    warn!(
                        "Failed to sync {} of {}: {e}",
                        action.kind.as_str(),
                        action.record_id
                    );
                    report.failed.push(action.id);
                }
            }
        }

        if report.attempted > 0 {
            info!(
                "Synced {} of {} pending actions",
                report.synced, report.attempted
            );
        }
        report
    }

    /// Sends one action to the server and reflects the result in the
    /// snapshot. Returns the server id when a local record was created.
    async fn replay(&self, action: &PendingAction) -> Result<Option<String>> {
        let record_id = action.record_id.as_str();
        match action.kind {
            ActionKind::Create => {
                let record = self.api.create_itinerary(payload_of(action)?).await?;
                let server_id = record.id().to_string();
                if let Err(e) = self.snapshot.replace(record_id, record).await {
                    warn!("Failed to store synced itinerary {server_id}: {e}");
                }
                if let Err(e) = self.queue.rebind(record_id, &server_id).await {
                    warn!("Failed to point queued changes of {record_id} at {server_id}: {e}");
                }
                Ok(Some(server_id))
            }
            ActionKind::Update => {
                awaiting_create(record_id)?;
                let record = self
                    .api
                    .update_itinerary(record_id, payload_of(action)?)
                    .await?;
                self.save_itinerary_offline(record).await;
                Ok(None)
            }
            ActionKind::Delete => {
                awaiting_create(record_id)?;
                match self.api.delete_itinerary(record_id).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {
                        debug!("Itinerary {record_id} was already deleted on the server");
                    }
                    Err(e) => return Err(e),
                }
                self.remove_itinerary_offline(record_id).await;
                Ok(None)
            }
        }
    }

    /// Syncs every `period` while the backend is reachable and changes are
    /// queued, until `shutdown` resolves.
    ///
    /// `on_tick` receives the cache state after each tick and the report of
    /// the sync run during that tick, if there was one. Periods shorter than
    /// one second are raised to one second.
    pub async fn run_auto_sync<F, T>(&self, period: Duration, shutdown: F, mut on_tick: T)
    where
        F: Future<Output = ()>,
        T: FnMut(&CacheInfo, Option<&SyncReport>),
    {
        let period = period.max(MIN_AUTO_SYNC_PERIOD);
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Auto-sync started, every {}s", period.as_secs());
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Auto-sync stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let info = self.get_cache_info().await;
                    if info.is_online && info.pending_sync_count > 0 {
                        let report = self.sync_pending_actions().await;
                        let info = self.get_cache_info().await;
                        on_tick(&info, Some(&report));
                    } else {
                        on_tick(&info, None);
                    }
                }
            }
        }
    }
}

fn payload_of(action: &PendingAction) -> Result<&Value> {
    action.payload.as_ref().ok_or_else(|| {
        WayfarerError::invalid_input("payload")
            .with_reason(format!("{} action {} has no payload", action.kind.as_str(), action.id))
    })
}

// An update or delete of a record created offline waits until the create
// has been replayed and the queue rebound to the server id.
fn awaiting_create(record_id: &str) -> Result<()> {
    if record_id.starts_with(LOCAL_ID_PREFIX) {
        return Err(WayfarerError::invalid_input("recordId")
            .with_reason(format!("{record_id} has not been created on the server yet")));
    }
    Ok(())
}
