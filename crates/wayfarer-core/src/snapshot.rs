//! Durable snapshot of the last known itinerary list.
//!
//! The whole list lives under one key and every write replaces it. Writers
//! that read, modify and write back hold the store's write lock for the
//! whole sequence so concurrent upserts cannot overwrite each other.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    error::{Result, WayfarerError},
    models::Itinerary,
    storage::{KeyValueStore, OFFLINE_ITINERARIES_KEY},
};

/// Last known-good itineraries, persisted in a [`KeyValueStore`].
pub struct SnapshotStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the snapshot with `records`.
    pub async fn save(&self, records: &[Itinerary]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(records).await
    }

    /// Replaces the snapshot with an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::InvalidInput` without touching storage when
    /// `value` is not an array or holds an element that is not an object.
    pub async fn save_value(&self, value: &Value) -> Result<()> {
        let Value::Array(elements) = value else {
            return Err(WayfarerError::invalid_input("records")
                .with_reason(format!("expected a list, got {}", json_type(value))));
        };
        let records = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                Itinerary::from_value(element.clone()).ok_or_else(|| {
                    WayfarerError::invalid_input("records").with_reason(format!(
                        "element {index} is {}, not a record",
                        json_type(element)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.save(&records).await
    }

    /// Reads the snapshot. An absent key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::Serialization` when the stored document is
    /// corrupt.
    pub async fn load(&self) -> Result<Vec<Itinerary>> {
        match self.store.get(OFFLINE_ITINERARIES_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the record with the same id, or appends it.
    pub async fn upsert(&self, record: Itinerary) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_or_empty().await?;
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.write(&records).await
    }

    /// Drops the record with `id`. Returns whether it was present.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_or_empty().await?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        let removed = records.len() != before;
        if removed {
            self.write(&records).await?;
        }
        Ok(removed)
    }

    /// Swaps the record `old_id` for `record`, keeping its position.
    pub async fn replace(&self, old_id: &str, record: Itinerary) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_or_empty().await?;
        records.retain(|existing| existing.id() != record.id() || existing.id() == old_id);
        match records.iter_mut().find(|existing| existing.id() == old_id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.write(&records).await
    }

    /// Deletes the snapshot key.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(OFFLINE_ITINERARIES_KEY).await
    }

    // A corrupt snapshot is replaced rather than blocking every later write.
    async fn load_or_empty(&self) -> Result<Vec<Itinerary>> {
        match self.load().await {
            Err(WayfarerError::Serialization { source }) => {
                warn!("Discarding corrupt itinerary snapshot: {source}");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn write(&self, records: &[Itinerary]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(OFFLINE_ITINERARIES_KEY, json).await?;
        debug!("Saved {} itineraries offline", records.len());
        Ok(())
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
