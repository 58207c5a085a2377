//! Command handlers for the Wayfarer CLI
//!
//! Each handler converts its clap arguments into core parameters, calls the
//! [`ItineraryCache`] and renders the markdown produced by the core display
//! types.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::info;
use wayfarer_core::{
    display::{Itineraries, LoadResult, MutationResult, OperationStatus, PendingActions},
    params::{
        ActionId, ClearCache, CreateItinerary, FilterItineraries, ListItineraries, RecordId,
        UpdateItinerary,
    },
    ActionKind, ItineraryCache, ItineraryFilter,
};

use crate::{
    args::{
        ClearArgs, CreateArgs, DeleteArgs, ListArgs, PendingCommands, UpdateArgs, WatchArgs,
    },
    renderer::TerminalRenderer,
};

/// Runs one CLI command against the cache.
pub struct Cli {
    cache: ItineraryCache,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(cache: ItineraryCache, renderer: TerminalRenderer) -> Self {
        Self { cache, renderer }
    }

    pub async fn list_itineraries(&self, args: ListArgs) -> Result<()> {
        let filter = ItineraryFilter::try_from(&FilterItineraries::from(&args))
            .context("Invalid list filter")?;

        if args.offline {
            let cached = self.cache.filtered_itineraries(&filter).await;
            return self.renderer.render(&Itineraries(cached).to_string());
        }

        let mut outcome = self
            .cache
            .load_itineraries(&ListItineraries::from(&args))
            .await;
        if args.has_filters() {
            outcome.itineraries = filter.apply(&outcome.itineraries);
        }

        info!(
            "Listed {} itineraries from {}",
            outcome.itineraries.len(),
            outcome.source
        );
        self.renderer.render(&LoadResult(&outcome).to_string())
    }

    pub async fn status(&self) -> Result<()> {
        let info = self.cache.get_cache_info().await;
        self.renderer
            .render(&format!("# Offline cache\n\n{info}"))
    }

    pub async fn sync(&self) -> Result<()> {
        let report = self.cache.sync_pending_actions().await;
        self.renderer.render(&report.to_string())?;
        if !report.failed.is_empty() {
            bail!("{} pending changes could not be synced", report.failed.len());
        }
        Ok(())
    }

    pub async fn create_itinerary(&self, args: CreateArgs) -> Result<()> {
        let params = CreateItinerary::from(args);
        let outcome = self
            .cache
            .create_itinerary(params.payload)
            .await
            .context("Failed to create itinerary")?;
        self.renderer
            .render(&MutationResult::new(ActionKind::Create, &outcome).to_string())
    }

    pub async fn update_itinerary(&self, args: UpdateArgs) -> Result<()> {
        let params = UpdateItinerary::from(args);
        let outcome = self
            .cache
            .update_itinerary(&params.id, params.payload)
            .await
            .with_context(|| format!("Failed to update itinerary {}", params.id))?;
        self.renderer
            .render(&MutationResult::new(ActionKind::Update, &outcome).to_string())
    }

    pub async fn delete_itinerary(&self, args: DeleteArgs) -> Result<()> {
        let params = RecordId::from(args);
        let outcome = self
            .cache
            .delete_itinerary(&params.id)
            .await
            .with_context(|| format!("Failed to delete itinerary {}", params.id))?;
        self.renderer
            .render(&MutationResult::new(ActionKind::Delete, &outcome).to_string())
    }

    pub async fn handle_pending_command(&self, command: PendingCommands) -> Result<()> {
        match command {
            PendingCommands::List => {
                let pending = PendingActions(self.cache.get_pending_sync().await);
                self.renderer.render(&pending.to_string())
            }
            PendingCommands::Remove(args) => {
                let params = ActionId::from(args);
                if !self.cache.remove_pending_sync(&params.id).await {
                    bail!("No pending change with ID {}", params.id);
                }
                let status = OperationStatus::success(format!("Dropped pending change {}", params.id));
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn clear_cache(&self, args: ClearArgs) -> Result<()> {
        let params = ClearCache::from(args);
        if !params.confirmed {
            bail!("Clearing removes saved itineraries and unsynced changes; pass --confirm");
        }
        let saved = self.cache.get_offline_itineraries().await.len();
        let pending = self.cache.get_pending_sync().await.len();
        self.cache.clear_offline_cache().await;
        let status = OperationStatus::success("Cleared the offline cache")
            .with_detail(format!("Removed: {saved} saved, {pending} pending."));
        self.renderer.render(&status.to_string())
    }

    pub async fn watch(&self, args: WatchArgs) -> Result<()> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {e}");
            }
        };

        self.cache
            .run_auto_sync(Duration::from_secs(args.interval), shutdown, |info, report| {
                let mut markdown = String::new();
                if let Some(report) = report {
                    markdown.push_str(&report.to_string());
                }
                markdown.push_str(&format!(
                    "{} | {} saved | {} pending\n",
                    if info.is_online { "online" } else { "offline" },
                    info.itineraries_count,
                    info.pending_sync_count
                ));
                if let Err(e) = self.renderer.render(&markdown) {
                    log::warn!("Failed to render sync status: {e}");
                }
            })
            .await;
        Ok(())
    }
}
