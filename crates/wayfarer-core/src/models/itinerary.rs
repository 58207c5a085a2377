//! Itinerary record model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::ItineraryStatus;

/// A trip record as served by the itinerary API.
///
/// The record is owned by the server, so it is kept exactly as received and
/// written back unchanged. The accessors below read the fields the cache and
/// its displays need; a missing, `null` or oddly typed field reads as absent
/// instead of making the record unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Itinerary {
    id: String,
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Itinerary {
    fn from(fields: Map<String, Value>) -> Self {
        // Mongo records carry `_id`; some serializers add an `id` virtual too.
        let id = ["_id", "id"]
            .iter()
            .find_map(|key| match fields.get(*key) {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            })
            .unwrap_or_default();
        Self { id, fields }
    }
}

impl From<Itinerary> for Map<String, Value> {
    fn from(itinerary: Itinerary) -> Self {
        itinerary.fields
    }
}

impl Itinerary {
    /// Creates a bare record with only an id and a title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert("_id".to_string(), Value::String(id.clone()));
        fields.insert("title".to_string(), Value::String(title.into()));
        Self { id, fields }
    }

    /// Wraps a JSON object as a record. Other values are not records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(fields.into()),
            _ => None,
        }
    }

    /// Builds a record from a JSON payload, forcing its id to `id`.
    ///
    /// A non-object payload yields a record holding only the id.
    pub fn from_payload(id: &str, payload: &Value) -> Self {
        let mut fields = match payload {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        fields.remove("id");
        fields.insert("_id".to_string(), Value::String(id.to_string()));
        Self {
            id: id.to_string(),
            fields,
        }
    }

    /// Returns a copy with the top-level fields of `patch` written over this
    /// record. Ids are never patched; non-object patches change nothing.
    pub fn merged_with(&self, patch: &Value) -> Self {
        let mut merged = self.clone();
        if let Value::Object(patch) = patch {
            for (field, value) in patch {
                if field != "_id" && field != "id" {
                    merged.fields.insert(field.clone(), value.clone());
                }
            }
        }
        merged
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Title, or an empty string when absent.
    pub fn title(&self) -> &str {
        self.text("title").unwrap_or_default()
    }

    pub fn city(&self) -> Option<&str> {
        self.nested_text("destination", "city")
    }

    pub fn country(&self) -> Option<&str> {
        self.nested_text("destination", "country")
    }

    pub fn start_date(&self) -> Option<&str> {
        self.text("startDate")
    }

    pub fn end_date(&self) -> Option<&str> {
        self.text("endDate")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.text("createdAt")
    }

    /// Status exactly as the server sent it.
    pub fn raw_status(&self) -> Option<&str> {
        self.text("status")
    }

    /// Parsed lifecycle status, when the server sent a known value.
    pub fn status(&self) -> Option<ItineraryStatus> {
        self.raw_status().and_then(|s| s.parse().ok())
    }

    /// Estimated budget total.
    pub fn budget_total(&self) -> Option<f64> {
        self.fields
            .get("budget")
            .and_then(|budget| budget.get("estimatedTotal"))
            .and_then(Value::as_f64)
    }

    pub fn budget_currency(&self) -> Option<&str> {
        self.nested_text("budget", "currency")
    }

    /// Budget level (`baixo`, `medio`, `alto`...).
    pub fn budget_level(&self) -> Option<&str> {
        self.nested_text("budget", "level")
    }

    /// True when the record was created offline and has no server id yet.
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    fn nested_text(&self, object: &str, field: &str) -> Option<&str> {
        self.fields
            .get(object)
            .and_then(|value| value.get(field))
            .and_then(Value::as_str)
    }
}

/// Prefix of ids assigned to itineraries created while offline.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Pagination metadata of an envelope list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}
