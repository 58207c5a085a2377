//! Pending action model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::status::ActionKind;

/// A mutation that has not been confirmed by the server yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    /// Client-generated identifier of this queue entry
    pub id: String,
    /// Which endpoint the replay goes to
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Itinerary the mutation targets
    pub record_id: String,
    /// Request body for create and update replays
    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// When the user issued the mutation
    #[serde(rename = "timestamp")]
    pub enqueued_at: Timestamp,
}

impl PendingAction {
    /// Creates a new action stamped with the current time and a fresh id.
    pub fn new(kind: ActionKind, record_id: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            record_id: record_id.into(),
            payload,
            enqueued_at: Timestamp::now(),
        }
    }
}
