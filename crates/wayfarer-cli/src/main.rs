//! Wayfarer CLI Application
//!
//! Command-line interface and MCP server for the offline itinerary cache.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands, ListArgs};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, WayfarerMcpServer};
use renderer::TerminalRenderer;
use wayfarer_core::{CacheConfig, ItineraryCacheBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        api_url,
        token,
        freshness_secs,
        probe_timeout_secs,
        request_timeout_secs,
        no_color,
        command,
    } = Args::parse();

    let config = CacheConfig::new(api_url)
        .with_auth_token(token)
        .with_freshness_window(Duration::from_secs(freshness_secs))
        .with_probe_timeout(Duration::from_secs(probe_timeout_secs))
        .with_request_timeout(Duration::from_secs(request_timeout_secs));

    let cache = ItineraryCacheBuilder::new()
        .with_database_path(database_file)
        .with_config(config)
        .build()
        .await
        .context("Failed to initialize itinerary cache")?;

    info!("Wayfarer started");

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        Some(List(args)) => Cli::new(cache, renderer).list_itineraries(args).await,
        Some(Status) => Cli::new(cache, renderer).status().await,
        Some(Sync) => Cli::new(cache, renderer).sync().await,
        Some(Create(args)) => Cli::new(cache, renderer).create_itinerary(args).await,
        Some(Update(args)) => Cli::new(cache, renderer).update_itinerary(args).await,
        Some(Delete(args)) => Cli::new(cache, renderer).delete_itinerary(args).await,
        Some(Pending { command }) => {
            Cli::new(cache, renderer)
                .handle_pending_command(command)
                .await
        }
        Some(Clear(args)) => Cli::new(cache, renderer).clear_cache(args).await,
        Some(Watch(args)) => Cli::new(cache, renderer).watch(args).await,
        Some(Serve) => {
            info!("Starting Wayfarer MCP server");
            run_stdio_server(WayfarerMcpServer::new(cache))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(cache, renderer)
                .list_itineraries(ListArgs::default())
                .await
        }
    }
}
