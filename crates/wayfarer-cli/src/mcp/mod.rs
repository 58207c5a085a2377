//! MCP server implementation for Wayfarer
//!
//! Exposes the offline itinerary cache to AI assistants over the Model
//! Context Protocol.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};
use wayfarer_core::ItineraryCache;

pub mod errors;
pub mod handlers;

pub use handlers::{
    ActionId, ClearCache, CreateItinerary, FilterItineraries, ListItineraries, McpResult,
    RecordId, UpdateItinerary,
};

/// MCP server for Wayfarer
#[derive(Clone)]
pub struct WayfarerMcpServer {
    cache: Arc<ItineraryCache>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WayfarerMcpServer {
    pub fn new(cache: ItineraryCache) -> Self {
        Self {
            cache: Arc::new(cache),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.cache.clone())
    }

    #[tool(
        name = "list_itineraries",
        description = "List the user's itineraries. Fetches from the server when it is reachable and saves the result for offline use; otherwise returns the saved list. Optional page, limit, sort_by and order are passed to the server. A leading '>' line explains when saved data is shown because the server failed."
    )]
    async fn list_itineraries(&self, params: Parameters<ListItineraries>) -> McpResult {
        self.handlers().list_itineraries(params).await
    }

    #[tool(
        name = "search_itineraries",
        description = "Search the saved itineraries without contacting the server. query matches title, city and country; status is one of rascunho, planejando, confirmado, em_andamento, concluido; sort is recent (default), oldest or date."
    )]
    async fn search_itineraries(&self, params: Parameters<FilterItineraries>) -> McpResult {
        self.handlers().search_itineraries(params).await
    }

    #[tool(
        name = "cache_info",
        description = "Report whether the server is reachable, how many itineraries are saved offline and how many changes are waiting to sync."
    )]
    async fn cache_info(&self) -> McpResult {
        self.handlers().cache_info().await
    }

    #[tool(
        name = "sync_pending",
        description = "Replay changes made while offline against the server, oldest first. Does nothing while offline. Changes that fail stay queued for the next sync."
    )]
    async fn sync_pending(&self) -> McpResult {
        self.handlers().sync_pending().await
    }

    #[tool(
        name = "list_pending",
        description = "List changes waiting to sync, oldest first, with their action IDs."
    )]
    async fn list_pending(&self) -> McpResult {
        self.handlers().list_pending().await
    }

    #[tool(
        name = "remove_pending",
        description = "Drop a queued change by its action ID without sending it to the server. The change is lost."
    )]
    async fn remove_pending(&self, params: Parameters<ActionId>) -> McpResult {
        self.handlers().remove_pending(params).await
    }

    #[tool(
        name = "create_itinerary",
        description = "Create an itinerary from a JSON payload (title, destination {city, country}, startDate, endDate, status...). While offline the trip is saved locally with a temporary 'local-' ID and created on the next sync."
    )]
    async fn create_itinerary(&self, params: Parameters<CreateItinerary>) -> McpResult {
        self.handlers().create_itinerary(params).await
    }

    #[tool(
        name = "update_itinerary",
        description = "Change fields of an itinerary by ID. While offline, or when the server fails, the change is applied to the saved copy and queued for sync. Rejected changes (4xx) are reported as errors."
    )]
    async fn update_itinerary(&self, params: Parameters<UpdateItinerary>) -> McpResult {
        self.handlers().update_itinerary(params).await
    }

    #[tool(
        name = "delete_itinerary",
        description = "Delete an itinerary by ID. While offline it is removed from the saved list and the delete is queued for sync."
    )]
    async fn delete_itinerary(&self, params: Parameters<RecordId>) -> McpResult {
        self.handlers().delete_itinerary(params).await
    }

    #[tool(
        name = "clear_cache",
        description = "Delete all saved itineraries and queued changes. Requires confirmed=true. Changes that were never synced are lost."
    )]
    async fn clear_cache(&self, params: Parameters<ClearCache>) -> McpResult {
        self.handlers().clear_cache(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WayfarerMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(r#"Wayfarer keeps a user's trip itineraries usable without a network connection.

## Core Concepts
- **Saved itineraries**: the last list the server returned, kept on disk
- **Pending changes**: creates, updates and deletes made while offline, waiting to be replayed

## Workflow
1. Use `list_itineraries` to read trips; it falls back to the saved list when the server is unreachable
2. Use `search_itineraries` to filter the saved list by text, status or date
3. Change trips with `create_itinerary`, `update_itinerary` and `delete_itinerary`; offline changes are queued
4. Check `cache_info` and call `sync_pending` once the server is reachable
5. Inspect the queue with `list_pending`; drop a change that should not be sent with `remove_pending`"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WayfarerMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Wayfarer MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
