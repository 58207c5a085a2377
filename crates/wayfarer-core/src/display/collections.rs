//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{Itinerary, PendingAction};

/// Newtype wrapper for displaying a list of itineraries.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{display::Itineraries, models::Itinerary};
///
/// let list = Itineraries(vec![
///     Itinerary::new("1", "Porto"),
///     Itinerary::new("2", "Kyoto"),
/// ]);
/// assert_eq!(list.len(), 2);
/// assert!(list.to_string().contains("## Kyoto"));
/// ```
pub struct Itineraries(pub Vec<Itinerary>);

impl Itineraries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Itinerary> {
        self.0.iter()
    }
}

impl Index<usize> for Itineraries {
    type Output = Itinerary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Itineraries {
    type Item = Itinerary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Itineraries {
    type Item = &'a Itinerary;
    type IntoIter = std::slice::Iter<'a, Itinerary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Itineraries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No itineraries found.")
        } else {
            for itinerary in &self.0 {
                write!(f, "{itinerary}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying the pending-action queue.
pub struct PendingActions(pub Vec<PendingAction>);

impl PendingActions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingAction> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PendingActions {
    type Item = &'a PendingAction;
    type IntoIter = std::slice::Iter<'a, PendingAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PendingActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No pending changes.")
        } else {
            for action in &self.0 {
                write!(f, "{action}")?;
            }
            Ok(())
        }
    }
}
