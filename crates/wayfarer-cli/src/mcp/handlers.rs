//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use wayfarer_core::{
    display::{Itineraries, LoadResult, MutationResult, OperationStatus, PendingActions},
    params as core, ActionKind, ItineraryCache, ItineraryFilter,
};

use super::errors::to_mcp_error;

// Core parameter types stay free of MCP derives; this transparent wrapper
// adds the Deserialize and JsonSchema impls rmcp needs.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type ListItineraries = McpParams<core::ListItineraries>;
pub type FilterItineraries = McpParams<core::FilterItineraries>;
pub type CreateItinerary = McpParams<core::CreateItinerary>;
pub type UpdateItinerary = McpParams<core::UpdateItinerary>;
pub type RecordId = McpParams<core::RecordId>;
pub type ActionId = McpParams<core::ActionId>;
pub type ClearCache = McpParams<core::ClearCache>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(markdown: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(markdown)]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    cache: Arc<ItineraryCache>,
}

impl McpHandlers {
    pub fn new(cache: Arc<ItineraryCache>) -> Self {
        Self { cache }
    }

    pub async fn list_itineraries(
        &self,
        Parameters(params): Parameters<ListItineraries>,
    ) -> McpResult {
        debug!("list_itineraries: {:?}", params);

        let outcome = self.cache.load_itineraries(params.as_ref()).await;
        text(LoadResult(&outcome).to_string())
    }

    pub async fn search_itineraries(
        &self,
        Parameters(params): Parameters<FilterItineraries>,
    ) -> McpResult {
        debug!("search_itineraries: {:?}", params);

        let filter = ItineraryFilter::try_from(params.as_ref())
            .map_err(|e| to_mcp_error("Invalid search", &e))?;
        let found = self.cache.filtered_itineraries(&filter).await;
        text(Itineraries(found).to_string())
    }

    pub async fn cache_info(&self) -> McpResult {
        let info = self.cache.get_cache_info().await;
        text(format!("# Offline cache\n\n{info}"))
    }

    pub async fn sync_pending(&self) -> McpResult {
        let report = self.cache.sync_pending_actions().await;
        text(report.to_string())
    }

    pub async fn list_pending(&self) -> McpResult {
        let pending = self.cache.get_pending_sync().await;
        text(PendingActions(pending).to_string())
    }

    pub async fn remove_pending(&self, Parameters(params): Parameters<ActionId>) -> McpResult {
        debug!("remove_pending: {:?}", params);

        let id = &params.as_ref().id;
        let status = if self.cache.remove_pending_sync(id).await {
            OperationStatus::success(format!("Dropped pending change {id}"))
        } else {
            OperationStatus::failure(format!("No pending change with ID {id}"))
        };
        text(status.to_string())
    }

    pub async fn create_itinerary(
        &self,
        Parameters(params): Parameters<CreateItinerary>,
    ) -> McpResult {
        debug!("create_itinerary: {:?}", params);

        let outcome = self
            .cache
            .create_itinerary(params.as_ref().payload.clone())
            .await
            .map_err(|e| to_mcp_error("Failed to create itinerary", &e))?;
        text(MutationResult::new(ActionKind::Create, &outcome).to_string())
    }

    pub async fn update_itinerary(
        &self,
        Parameters(params): Parameters<UpdateItinerary>,
    ) -> McpResult {
        debug!("update_itinerary: {:?}", params);

        let params = params.as_ref();
        let outcome = self
            .cache
            .update_itinerary(&params.id, params.payload.clone())
            .await
            .map_err(|e| to_mcp_error("Failed to update itinerary", &e))?;
        text(MutationResult::new(ActionKind::Update, &outcome).to_string())
    }

    pub async fn delete_itinerary(&self, Parameters(params): Parameters<RecordId>) -> McpResult {
        debug!("delete_itinerary: {:?}", params);

        let outcome = self
            .cache
            .delete_itinerary(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to delete itinerary", &e))?;
        text(MutationResult::new(ActionKind::Delete, &outcome).to_string())
    }

    pub async fn clear_cache(&self, Parameters(params): Parameters<ClearCache>) -> McpResult {
        if !params.as_ref().confirmed {
            let status = OperationStatus::warning("Nothing was cleared").with_detail(
                "Clearing removes saved itineraries and unsynced changes; set confirmed=true",
            );
            return text(status.to_string());
        }
        let saved = self.cache.get_offline_itineraries().await.len();
        let pending = self.cache.get_pending_sync().await.len();
        self.cache.clear_offline_cache().await;
        let status = OperationStatus::success("Cleared the offline cache")
            .with_detail(format!("Removed: {saved} saved, {pending} pending."));
        text(status.to_string())
    }
}
