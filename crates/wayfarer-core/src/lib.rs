//! Core library for Wayfarer, an offline-capable itinerary cache.
//!
//! This crate keeps a user's trip itineraries usable without a network
//! connection: it remembers the last list the server returned, queues the
//! changes made while offline, and replays them once the server is
//! reachable again.
//!
//! # Components
//!
//! - [`probe`]: Cached online/offline verdict backed by a health probe
//! - [`snapshot`]: Durable copy of the last known itinerary list
//! - [`queue`]: Durable FIFO of mutations awaiting replay
//! - [`cache`]: The [`ItineraryCache`] orchestrator tying them together
//! - [`remote`]: The [`ItineraryApi`] seam and its reqwest implementation
//! - [`storage`]: The [`KeyValueStore`] seam with SQLite and in-memory stores
//! - [`display`]: Markdown formatting shared by the CLI and MCP server
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wayfarer_core::{
//!     CacheConfig, ItineraryCacheBuilder,
//!     display::LoadResult,
//!     params::ListItineraries,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = ItineraryCacheBuilder::new()
//!     .with_database_path(Some("wayfarer.db"))
//!     .with_config(CacheConfig::new("http://localhost:3000/api"))
//!     .build()
//!     .await?;
//!
//! let outcome = cache.load_itineraries(&ListItineraries::default()).await;
//! print!("{}", LoadResult(&outcome));
//!
//! let info = cache.get_cache_info().await;
//! println!("{} changes waiting to sync", info.pending_sync_count);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod probe;
pub mod queue;
pub mod remote;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types
pub use cache::{ItineraryCache, ItineraryCacheBuilder};
pub use config::CacheConfig;
pub use db::Database;
pub use display::{
    Itineraries, LoadResult, LocalDateTime, MutationResult, OperationStatus, PendingActions,
};
pub use error::{Result, WayfarerError};
pub use models::{
    ActionKind, CacheInfo, DataSource, Itinerary, ItineraryFilter, ItineraryStatus, LoadOutcome,
    MutationOutcome, Notice, PendingAction, SortOrder, SyncReport,
};
pub use params::{
    ActionId, ClearCache, CreateItinerary, FilterItineraries, ListItineraries, RecordId,
    UpdateItinerary,
};
pub use remote::{HttpApi, ItineraryApi};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
