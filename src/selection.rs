//! Selection Resolution Module
//!
//! Turns the user's choice among geocoding candidates into the coordinates
//! and timezone the forecast request needs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::PlaceCandidate;
use crate::{DashboardError, Result};

/// The place a forecast will be fetched for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// Position of the chosen candidate in the search results
    pub index: usize,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Never empty; `UTC` when the geocoder reported no timezone
    pub timezone: String,
}

/// Service for resolving a candidate selection
pub struct SelectionResolver;

impl SelectionResolver {
    /// Resolve a selection by candidate index; `None` picks the first candidate.
    pub fn resolve(candidates: &[PlaceCandidate], selection: Option<usize>) -> Result<ResolvedPlace> {
        if candidates.is_empty() {
            return Err(DashboardError::validation("No candidates to choose from"));
        }

        let index = selection.unwrap_or(0);
        let candidate = candidates.get(index).ok_or_else(|| {
            DashboardError::validation(format!(
                "Selection {index} is out of range ({} candidates)",
                candidates.len()
            ))
        })?;

        let resolved = ResolvedPlace {
            index,
            display_name: candidate.display_name.clone(),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            timezone: candidate.timezone_or_default().to_string(),
        };

        debug!(
            "Resolved selection {}: {} at ({}, {}) tz={}",
            index, resolved.display_name, resolved.latitude, resolved.longitude, resolved.timezone
        );
        Ok(resolved)
    }

    /// Find the candidate index for a display name.
    ///
    /// Candidates sharing a display name cannot be told apart this way; the
    /// first match wins. Prefer [`SelectionResolver::resolve`] with an index.
    #[must_use]
    pub fn position_by_name(candidates: &[PlaceCandidate], display_name: &str) -> Option<usize> {
        candidates
            .iter()
            .position(|c| c.display_name == display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, country: &str, lat: f64, tz: Option<&str>) -> PlaceCandidate {
        PlaceCandidate::new(
            name.to_string(),
            Some(country.to_string()),
            None,
            lat,
            10.0,
            tz.map(str::to_string),
        )
    }

    #[test]
    fn test_default_selection_is_first_candidate() {
        let candidates = vec![
            candidate("Springfield", "United States", 39.8, Some("America/Chicago")),
            candidate("Springfield", "United States", 37.2, Some("America/Chicago")),
        ];
        let place = SelectionResolver::resolve(&candidates, None).unwrap();
        assert_eq!(place.index, 0);
        assert_eq!(place.latitude, 39.8);
    }

    #[test]
    fn test_index_selection_distinguishes_identical_names() {
        let candidates = vec![
            candidate("Springfield", "United States", 39.8, None),
            candidate("Springfield", "United States", 37.2, None),
        ];
        let place = SelectionResolver::resolve(&candidates, Some(1)).unwrap();
        assert_eq!(place.latitude, 37.2);
        assert_eq!(place.timezone, "UTC");
    }

    #[test]
    fn test_name_lookup_resolves_duplicates_to_first_index() {
        let candidates = vec![
            candidate("Springfield", "United States", 39.8, None),
            candidate("Springfield", "United States", 37.2, None),
        ];
        let name = candidates[1].display_name.clone();
        assert_eq!(SelectionResolver::position_by_name(&candidates, &name), Some(0));
        assert_eq!(SelectionResolver::position_by_name(&candidates, "Paris, France ()"), None);
    }

    #[test]
    fn test_out_of_range_and_empty() {
        let candidates = vec![candidate("Seoul", "South Korea", 37.5, Some("Asia/Seoul"))];
        assert!(matches!(
            SelectionResolver::resolve(&candidates, Some(3)),
            Err(DashboardError::Validation { .. })
        ));
        assert!(SelectionResolver::resolve(&[], None).is_err());
    }
}
