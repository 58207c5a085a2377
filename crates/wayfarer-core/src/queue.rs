//! Durable queue of mutations awaiting replay.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    error::{Result, WayfarerError},
    models::{ActionKind, PendingAction},
    storage::{KeyValueStore, PENDING_SYNC_KEY},
};

/// Insertion-ordered list of [`PendingAction`]s stored under one key.
///
/// Every mutation rewrites the whole list while holding the queue's write
/// lock, so back-to-back enqueues from different tasks are all kept.
pub struct PendingQueue {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl PendingQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Appends a new action stamped with the current time.
    pub async fn enqueue(
        &self,
        kind: ActionKind,
        record_id: &str,
        payload: Option<Value>,
    ) -> Result<PendingAction> {
        let action = PendingAction::new(kind, record_id, payload);

        let _guard = self.write_lock.lock().await;
        let mut pending = self.list_or_empty().await?;
        pending.push(action.clone());
        self.write(&pending).await?;

        info!("Queued pending action: {} {}", kind.as_str(), record_id);
        Ok(action)
    }

    /// Current queue, oldest first. An absent key is an empty queue.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::Serialization` when the stored document is
    /// corrupt.
    pub async fn list(&self) -> Result<Vec<PendingAction>> {
        match self.store.get(PENDING_SYNC_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Removes the action with `action_id`. Returns whether it was queued.
    pub async fn remove(&self, action_id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut pending = self.list().await?;
        let before = pending.len();
        pending.retain(|action| action.id != action_id);
        let removed = pending.len() != before;
        if removed {
            self.write(&pending).await?;
            debug!("Removed pending action {action_id}");
        }
        Ok(removed)
    }

    /// Points queued actions that target `old_record_id` at `new_record_id`.
    ///
    /// Used once an itinerary created offline receives its server id, so the
    /// updates and deletes queued after the create reach the right record.
    pub async fn rebind(&self, old_record_id: &str, new_record_id: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut pending = self.list().await?;
        let mut rebound = 0;
        for action in pending
            .iter_mut()
            .filter(|action| action.record_id == old_record_id)
        {
            action.record_id = new_record_id.to_string();
            rebound += 1;
        }
        if rebound > 0 {
            self.write(&pending).await?;
            debug!("Rebound {rebound} pending actions from {old_record_id} to {new_record_id}");
        }
        Ok(rebound)
    }

    /// Deletes the queue key.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(PENDING_SYNC_KEY).await
    }

    // An unreadable queue cannot be replayed anyway; start a fresh one.
    async fn list_or_empty(&self) -> Result<Vec<PendingAction>> {
        match self.list().await {
            Err(WayfarerError::Serialization { source }) => {
                warn!("Discarding corrupt pending-action queue: {source}");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn write(&self, pending: &[PendingAction]) -> Result<()> {
        let json = serde_json::to_string(pending)?;
        self.store.set(PENDING_SYNC_KEY, json).await
    }
}
