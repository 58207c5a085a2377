//! Command-line arguments using clap's derive API.
//!
//! Argument structs carry clap-specific attributes only and convert into the
//! interface-agnostic parameter types of `wayfarer_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → ItineraryCache
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use wayfarer_core::{
    config::DEFAULT_API_URL, params::*, ItineraryStatus, SortOrder,
};

/// Offline-capable itinerary cache
///
/// Wayfarer keeps your trip itineraries available without a connection. It
/// saves the last list the server returned, queues changes made offline and
/// replays them once the server is reachable again. It can also run as an
/// MCP (Model Context Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "wf")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/wayfarer/wayfarer.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of the itinerary API
    #[arg(long, global = true, env = "WAYFARER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token for the itinerary API
    #[arg(long, global = true, env = "WAYFARER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Seconds a connectivity check is trusted before probing again
    #[arg(long, global = true, default_value_t = 10)]
    pub freshness_secs: u64,

    /// Seconds to wait for the health endpoint before assuming offline
    #[arg(long, global = true, default_value_t = 3)]
    pub probe_timeout_secs: u64,

    /// Seconds to wait for list and mutation requests
    #[arg(long, global = true, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Wayfarer CLI
#[derive(Subcommand)]
pub enum Commands {
    /// List itineraries, from the server when reachable
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show connectivity, saved itineraries and pending changes
    Status,
    /// Replay pending changes against the server
    Sync,
    /// Create an itinerary
    #[command(alias = "new")]
    Create(CreateArgs),
    /// Change an itinerary
    #[command(alias = "edit")]
    Update(UpdateArgs),
    /// Delete an itinerary
    #[command(alias = "rm")]
    Delete(DeleteArgs),
    /// Inspect or drop queued changes
    #[command(alias = "p")]
    Pending {
        #[command(subcommand)]
        command: PendingCommands,
    },
    /// Delete saved itineraries and pending changes
    Clear(ClearArgs),
    /// Sync periodically until interrupted
    Watch(WatchArgs),
    /// Start the MCP server
    Serve,
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// List queued changes, oldest first
    #[command(alias = "ls")]
    List,
    /// Drop a queued change without sending it
    #[command(alias = "rm")]
    Remove(PendingRemoveArgs),
}

/// List itineraries
///
/// Fetches from the server when it is reachable and saves the result for
/// offline use. Otherwise shows the saved list. Filters are applied locally.
#[derive(ClapArgs, Default)]
pub struct ListArgs {
    /// Page to request from the server
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size to request from the server
    #[arg(long)]
    pub limit: Option<u32>,
    /// Server-side sort field (e.g. createdAt)
    #[arg(long)]
    pub sort_by: Option<String>,
    /// Server-side sort direction (asc or desc)
    #[arg(long)]
    pub order: Option<String>,
    /// Only show itineraries whose title, city or country contains this text
    #[arg(short, long)]
    pub query: Option<String>,
    /// Only show itineraries with this status
    #[arg(short, long)]
    pub status: Option<StatusArg>,
    /// Local ordering of the result
    #[arg(long)]
    pub sort: Option<SortArg>,
    /// Use saved itineraries only, without contacting the server
    #[arg(long)]
    pub offline: bool,
}

impl ListArgs {
    /// True when any local filter or ordering was requested.
    pub fn has_filters(&self) -> bool {
        self.query.is_some() || self.status.is_some() || self.sort.is_some()
    }
}

impl From<&ListArgs> for ListItineraries {
    fn from(val: &ListArgs) -> Self {
        ListItineraries {
            page: val.page,
            limit: val.limit,
            sort_by: val.sort_by.clone(),
            order: val.order.clone(),
        }
    }
}

impl From<&ListArgs> for FilterItineraries {
    fn from(val: &ListArgs) -> Self {
        FilterItineraries {
            query: val.query.clone(),
            status: val.status.map(|s| ItineraryStatus::from(s).as_str().to_string()),
            sort: val.sort.map(|s| s.to_string()),
        }
    }
}

/// Fields shared by create and update.
#[derive(ClapArgs, Default)]
pub struct ItineraryFields {
    /// Title of the trip
    #[arg(short, long)]
    pub title: Option<String>,
    /// Destination city
    #[arg(long)]
    pub city: Option<String>,
    /// Destination country
    #[arg(long)]
    pub country: Option<String>,
    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Trip status
    #[arg(short, long)]
    pub status: Option<StatusArg>,
    /// Extra fields as a JSON object, merged under the flags above
    #[arg(long, value_parser = parse_json_object)]
    pub json: Option<Map<String, Value>>,
}

impl ItineraryFields {
    /// Builds the request body. Flags override keys of `--json`.
    pub fn into_payload(self) -> Value {
        let mut payload = self.json.unwrap_or_default();

        if let Some(title) = self.title {
            payload.insert("title".to_string(), Value::String(title));
        }
        if self.city.is_some() || self.country.is_some() {
            let mut destination = match payload.remove("destination") {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            };
            if let Some(city) = self.city {
                destination.insert("city".to_string(), Value::String(city));
            }
            if let Some(country) = self.country {
                destination.insert("country".to_string(), Value::String(country));
            }
            payload.insert("destination".to_string(), Value::Object(destination));
        }
        if let Some(start) = self.start {
            payload.insert("startDate".to_string(), Value::String(start));
        }
        if let Some(end) = self.end {
            payload.insert("endDate".to_string(), Value::String(end));
        }
        if let Some(status) = self.status {
            payload.insert(
                "status".to_string(),
                Value::String(ItineraryStatus::from(status).as_str().to_string()),
            );
        }

        Value::Object(payload)
    }
}

/// Create an itinerary
///
/// Sent to the server right away when it is reachable. Otherwise the trip is
/// saved locally with a temporary id and created on the next sync.
#[derive(ClapArgs)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: ItineraryFields,
}

impl From<CreateArgs> for CreateItinerary {
    fn from(val: CreateArgs) -> Self {
        CreateItinerary {
            payload: val.fields.into_payload(),
        }
    }
}

/// Change an itinerary
#[derive(ClapArgs)]
pub struct UpdateArgs {
    /// ID of the itinerary to change
    pub id: String,
    #[command(flatten)]
    pub fields: ItineraryFields,
}

impl From<UpdateArgs> for UpdateItinerary {
    fn from(val: UpdateArgs) -> Self {
        UpdateItinerary {
            id: val.id,
            payload: val.fields.into_payload(),
        }
    }
}

/// Delete an itinerary
#[derive(ClapArgs)]
pub struct DeleteArgs {
    /// ID of the itinerary to delete
    pub id: String,
}

impl From<DeleteArgs> for RecordId {
    fn from(val: DeleteArgs) -> Self {
        RecordId { id: val.id }
    }
}

/// Drop a queued change
#[derive(ClapArgs)]
pub struct PendingRemoveArgs {
    /// Action ID as shown by `wf pending list`
    pub id: String,
}

impl From<PendingRemoveArgs> for ActionId {
    fn from(val: PendingRemoveArgs) -> Self {
        ActionId { id: val.id }
    }
}

/// Delete saved itineraries and pending changes
#[derive(ClapArgs)]
pub struct ClearArgs {
    /// Confirm the wipe (pending changes that were never synced are lost)
    #[arg(long)]
    pub confirm: bool,
}

impl From<ClearArgs> for ClearCache {
    fn from(val: ClearArgs) -> Self {
        ClearCache {
            confirmed: val.confirm,
        }
    }
}

/// Sync periodically until interrupted
#[derive(ClapArgs)]
pub struct WatchArgs {
    /// Seconds between sync attempts
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

/// Command-line representation of itinerary statuses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Draft,
    Planning,
    Confirmed,
    InProgress,
    Completed,
}

impl From<StatusArg> for ItineraryStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Draft => ItineraryStatus::Draft,
            StatusArg::Planning => ItineraryStatus::Planning,
            StatusArg::Confirmed => ItineraryStatus::Confirmed,
            StatusArg::InProgress => ItineraryStatus::InProgress,
            StatusArg::Completed => ItineraryStatus::Completed,
        }
    }
}

/// Command-line representation of local list orderings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Newest created first
    Recent,
    /// Oldest created first
    Oldest,
    /// Earliest trip first
    Date,
}

impl std::fmt::Display for SortArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortArg::Recent => write!(f, "recent"),
            SortArg::Oldest => write!(f, "oldest"),
            SortArg::Date => write!(f, "date"),
        }
    }
}

impl From<SortArg> for SortOrder {
    fn from(val: SortArg) -> Self {
        match val {
            SortArg::Recent => SortOrder::Recent,
            SortArg::Oldest => SortOrder::Oldest,
            SortArg::Date => SortOrder::TripDate,
        }
    }
}

fn parse_json_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}
