//! Data models for cached itineraries and queued mutations.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures and presentation stay
//! separate.
//!
//! # Examples
//!
//! ```rust
//! use wayfarer_core::models::{ActionKind, Itinerary, ItineraryStatus, PendingAction};
//! use serde_json::json;
//!
//! let record: Itinerary = serde_json::from_value(json!({
//!     "_id": "665f1c",
//!     "title": "Lisbon long weekend",
//!     "status": "planejando",
//!     "days": [],
//! }))
//! .unwrap();
//! assert_eq!(record.status(), Some(ItineraryStatus::Planning));
//! assert!(record.get("days").is_some());
//!
//! let action = PendingAction::new(ActionKind::Delete, record.id(), None);
//! assert_eq!(action.record_id, "665f1c");
//! ```

pub mod filters;
pub mod itinerary;
pub mod outcomes;
pub mod pending;
pub mod status;


pub use filters::{ItineraryFilter, SortOrder};
pub use itinerary::{Itinerary, Pagination, LOCAL_ID_PREFIX};
pub use outcomes::{
    CacheInfo, ConnectivityState, DataSource, LoadOutcome, MutationOutcome, Notice, SyncReport,
};
pub use pending::PendingAction;
pub use status::{ActionKind, ItineraryStatus};
