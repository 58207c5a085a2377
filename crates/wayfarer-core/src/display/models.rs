//! Display implementations for domain models.
//!
//! Output is markdown so the terminal renderer and MCP clients can both
//! present it.

use std::fmt;

use super::datetime::{LocalDateTime, TripDate};
use crate::models::{
    ActionKind, CacheInfo, DataSource, Itinerary, ItineraryStatus, Notice, PendingAction,
    SyncReport,
};

impl fmt::Display for ItineraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Network => write!(f, "server"),
            DataSource::Cache => write!(f, "offline cache"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ShowingCached => write!(f, "Could not reach the server. Showing saved itineraries."),
            Notice::LoadFailed => write!(f, "Could not load itineraries and none are saved offline."),
        }
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.title() {
            "" => "(untitled)",
            title => title,
        };
        writeln!(f, "## {title}")?;
        writeln!(f)?;

        if self.is_local() {
            writeln!(f, "- **ID**: {} (not yet synced)", self.id())?;
        } else {
            writeln!(f, "- **ID**: {}", self.id())?;
        }

        match (self.status(), self.raw_status()) {
            (Some(status), _) => writeln!(f, "- **Status**: {}", status.with_icon())?,
            (None, Some(raw)) => writeln!(f, "- **Status**: {raw}")?,
            (None, None) => {}
        }

        let place = [self.city(), self.country()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !place.is_empty() {
            writeln!(f, "- **Destination**: {place}")?;
        }

        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => {
                writeln!(f, "- **Dates**: {} to {}", TripDate(start), TripDate(end))?
            }
            (Some(start), None) => writeln!(f, "- **Starts**: {}", TripDate(start))?,
            (None, Some(end)) => writeln!(f, "- **Ends**: {}", TripDate(end))?,
            (None, None) => {}
        }

        if let Some(total) = self.budget_total() {
            let currency = self.budget_currency().unwrap_or("");
            writeln!(f, "- **Budget**: {total:.2} {currency}")?;
        } else if let Some(level) = self.budget_level() {
            writeln!(f, "- **Budget**: {level}")?;
        }

        writeln!(f)
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} {}", self.kind, self.record_id)?;
        writeln!(f)?;
        writeln!(f, "- **Action ID**: {}", self.id)?;
        writeln!(f, "- **Queued**: {}", LocalDateTime(&self.enqueued_at))?;
        if let Some(title) = self
            .payload
            .as_ref()
            .and_then(|payload| payload.get("title"))
            .and_then(|title| title.as_str())
        {
            writeln!(f, "- **Title**: {title}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **Connectivity**: {}",
            if self.is_online { "online" } else { "offline" }
        )?;
        writeln!(f, "- **Saved itineraries**: {}", self.itineraries_count)?;
        writeln!(f, "- **Pending changes**: {}", self.pending_sync_count)
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped_offline {
            return writeln!(f, "Offline: pending changes will sync when the server is reachable.");
        }
        if self.attempted == 0 {
            return writeln!(f, "Nothing to sync.");
        }
        writeln!(f, "Synced {} of {} pending changes.", self.synced, self.attempted)?;
        if !self.failed.is_empty() {
            writeln!(f)?;
            writeln!(f, "Still queued:")?;
            for id in &self.failed {
                writeln!(f, "- {id}")?;
            }
        }
        Ok(())
    }
}
