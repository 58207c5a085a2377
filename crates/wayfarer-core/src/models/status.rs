//! Status enumerations for itineraries and pending actions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a trip as reported by the server.
///
/// The server uses Portuguese identifiers on the wire; [`as_str`] returns
/// them unchanged so records round-trip.
///
/// [`as_str`]: ItineraryStatus::as_str
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItineraryStatus {
    #[serde(rename = "rascunho")]
    Draft,
    #[serde(rename = "planejando")]
    Planning,
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Completed,
}

impl FromStr for ItineraryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rascunho" | "draft" => Ok(ItineraryStatus::Draft),
            "planejando" | "planning" => Ok(ItineraryStatus::Planning),
            "confirmado" | "confirmed" => Ok(ItineraryStatus::Confirmed),
            "em_andamento" | "inprogress" | "in_progress" => Ok(ItineraryStatus::InProgress),
            "concluido" | "completed" | "done" => Ok(ItineraryStatus::Completed),
            _ => Err(format!("Invalid itinerary status: {s}")),
        }
    }
}

impl ItineraryStatus {
    /// Wire representation used by the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItineraryStatus::Draft => "rascunho",
            ItineraryStatus::Planning => "planejando",
            ItineraryStatus::Confirmed => "confirmado",
            ItineraryStatus::InProgress => "em_andamento",
            ItineraryStatus::Completed => "concluido",
        }
    }

    /// Human label with an icon, for lists.
    pub fn with_icon(&self) -> &'static str {
        match self {
            ItineraryStatus::Draft => "✎ Draft",
            ItineraryStatus::Planning => "○ Planning",
            ItineraryStatus::Confirmed => "✓ Confirmed",
            ItineraryStatus::InProgress => "➤ In Progress",
            ItineraryStatus::Completed => "★ Completed",
        }
    }
}

/// Kind of mutation recorded in the pending-action queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(ActionKind::Create),
            "update" => Ok(ActionKind::Update),
            "delete" => Ok(ActionKind::Delete),
            _ => Err(format!("Invalid action kind: {s}")),
        }
    }
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}
