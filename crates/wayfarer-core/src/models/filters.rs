//! Filtering and ordering of cached itineraries.

use std::cmp::Ordering;

use jiff::{civil::Date, tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};

use super::{itinerary::Itinerary, status::ItineraryStatus};
use crate::{
    error::{Result, WayfarerError},
    params::FilterItineraries,
};

/// Ordering applied to an itinerary list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest created first
    #[default]
    Recent,
    /// Oldest created first
    Oldest,
    /// Earliest trip start first
    TripDate,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "oldest" => Ok(SortOrder::Oldest),
            "date" | "trip_date" | "tripdate" => Ok(SortOrder::TripDate),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

/// Search, status and ordering criteria for itinerary lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryFilter {
    /// Case-insensitive text matched against title, city and country
    pub query: Option<String>,
    pub status: Option<ItineraryStatus>,
    pub sort: SortOrder,
}

impl TryFrom<&FilterItineraries> for ItineraryFilter {
    type Error = WayfarerError;

    /// Blank queries are dropped; unknown statuses and sort orders are
    /// rejected rather than silently matching everything.
    fn try_from(params: &FilterItineraries) -> Result<Self> {
        let status = match params.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse().map_err(|e: String| {
                WayfarerError::invalid_input("status").with_reason(e)
            })?),
        };
        let sort = match params.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e: String| WayfarerError::invalid_input("sort").with_reason(e))?,
        };

        Ok(Self {
            query: params
                .query
                .as_ref()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            status,
            sort,
        })
    }
}

impl ItineraryFilter {
    /// Returns the matching itineraries in the requested order.
    pub fn apply(&self, itineraries: &[Itinerary]) -> Vec<Itinerary> {
        let query = self.query.as_ref().map(|q| q.to_lowercase());

        let mut filtered: Vec<Itinerary> = itineraries
            .iter()
            .filter(|item| match &query {
                Some(query) => matches_query(item, query),
                None => true,
            })
            .filter(|item| match self.status {
                Some(status) => item.status() == Some(status),
                None => true,
            })
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Recent => filtered.sort_by(|a, b| {
                compare_instants(instant(a.created_at()), instant(b.created_at()), true)
            }),
            SortOrder::Oldest => filtered.sort_by(|a, b| {
                compare_instants(instant(a.created_at()), instant(b.created_at()), false)
            }),
            SortOrder::TripDate => filtered.sort_by(|a, b| {
                compare_instants(instant(a.start_date()), instant(b.start_date()), false)
            }),
        }

        filtered
    }
}

fn matches_query(item: &Itinerary, query: &str) -> bool {
    [Some(item.title()), item.city(), item.country()]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(query))
}

fn instant(value: Option<&str>) -> Option<Timestamp> {
    value.and_then(parse_instant)
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (as UTC
/// midnight).
pub(crate) fn parse_instant(value: &str) -> Option<Timestamp> {
    value.parse::<Timestamp>().ok().or_else(|| {
        value
            .parse::<Date>()
            .ok()
            .and_then(|date| date.to_zoned(TimeZone::UTC).ok())
            .map(|zoned| zoned.timestamp())
    })
}

/// Records without a parseable date always sort last.
fn compare_instants(a: Option<Timestamp>, b: Option<Timestamp>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
