//! Display formatting for itineraries, queued actions and cache state.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation results get newtype wrappers so that the CLI
//! and the MCP server render the same markdown.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │   Collections   │    │    Markdown     │
//! │ (Itinerary, ..) │───▶│  & Result Types │───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: `Itineraries` and `PendingActions` list wrappers
//! - [`results`]: Outcome wrappers for mutations and reads
//! - [`status`]: Success/error confirmation lines (`OperationStatus`)
//! - [`datetime`]: Timestamp and trip date formatting
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use wayfarer_core::{display::Itineraries, models::Itinerary};
//!
//! let list = Itineraries(vec![Itinerary::new("665f1c", "Lisbon long weekend")]);
//! let output = list.to_string();
//! assert!(output.contains("## Lisbon long weekend"));
//!
//! assert_eq!(Itineraries(vec![]).to_string(), "No itineraries found.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Itineraries, PendingActions};
pub use datetime::{LocalDateTime, TripDate};
pub use results::{LoadResult, MutationResult};
pub use status::{OperationStatus, StatusKind};
