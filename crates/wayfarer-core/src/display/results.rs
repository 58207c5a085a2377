//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use super::collections::Itineraries;
use crate::models::{ActionKind, LoadOutcome, MutationOutcome};

/// Wrapper type for displaying the result of a create, update or delete.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{
///     display::MutationResult,
///     models::{ActionKind, Itinerary, MutationOutcome},
/// };
///
/// let outcome = MutationOutcome::Applied(Some(Itinerary::new("665f1c", "Porto")));
/// let output = MutationResult::new(ActionKind::Create, &outcome).to_string();
/// assert!(output.starts_with("Created itinerary with ID: 665f1c"));
/// ```
pub struct MutationResult<'a> {
    pub kind: ActionKind,
    pub outcome: &'a MutationOutcome,
}

impl<'a> MutationResult<'a> {
    pub fn new(kind: ActionKind, outcome: &'a MutationOutcome) -> Self {
        Self { kind, outcome }
    }

    fn verb(&self) -> &'static str {
        match self.kind {
            ActionKind::Create => "Created",
            ActionKind::Update => "Updated",
            ActionKind::Delete => "Deleted",
        }
    }
}

impl fmt::Display for MutationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            MutationOutcome::Applied(Some(record)) => {
                writeln!(f, "{} itinerary with ID: {}", self.verb(), record.id())?;
                writeln!(f)?;
                write!(f, "{record}")
            }
            MutationOutcome::Applied(None) => writeln!(f, "{} itinerary.", self.verb()),
            MutationOutcome::Queued(action) => {
                writeln!(
                    f,
                    "Queued {} of {} for sync (action {}).",
                    action.kind, action.record_id, action.id
                )
            }
        }
    }
}

/// Wrapper type for displaying a list read together with where it came
/// from and any notice the reader should see.
pub struct LoadResult<'a>(pub &'a LoadOutcome);

impl fmt::Display for LoadResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        if let Some(notice) = outcome.notice {
            writeln!(f, "> {notice}")?;
            writeln!(f)?;
        }

        write!(f, "{}", Itineraries(outcome.itineraries.clone()))?;

        if let Some(pagination) = &outcome.pagination {
            if pagination.pages > 1 {
                writeln!(
                    f,
                    "Page {} of {} ({} itineraries)",
                    pagination.page, pagination.pages, pagination.total
                )?;
            }
        }
        Ok(())
    }
}
