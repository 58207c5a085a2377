//! Parameter structures for Wayfarer operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. Interface layers wrap them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema generation for the MCP server is available behind the
//! `schema` feature.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters of the list-itineraries endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListItineraries {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Server-side sort field (e.g. "createdAt")
    pub sort_by: Option<String>,
    /// "asc" or "desc"
    pub order: Option<String>,
}

impl ListItineraries {
    /// Query string pairs in the names the API expects.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order", order.clone()));
        }
        pairs
    }
}

/// Local filtering of the cached itinerary list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct FilterItineraries {
    /// Text matched against title, city and country
    pub query: Option<String>,
    /// Status filter (rascunho, planejando, confirmado, em_andamento, concluido)
    pub status: Option<String>,
    /// recent (default), oldest or date
    pub sort: Option<String>,
}

/// Parameters for creating an itinerary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateItinerary {
    /// Request body sent to the server (title, destination, dates...)
    pub payload: Value,
}

/// Parameters for updating an itinerary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateItinerary {
    /// Id of the itinerary to update
    pub id: String,
    /// Fields to change
    pub payload: Value,
}

/// Parameters for operations addressing one itinerary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RecordId {
    /// The itinerary id
    pub id: String,
}

/// Parameters for operations addressing one pending action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ActionId {
    /// The pending action id
    pub id: String,
}

/// Parameters for wiping the offline cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ClearCache {
    /// Must be true; unsynchronized changes are lost
    #[serde(default)]
    pub confirmed: bool,
}
