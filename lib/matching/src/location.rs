//! Location resolution
//!
//! Maps a free-text city/state mention onto a (city, state) pair that exists
//! in the catalog. Resolution degrades from exact match to substring match to
//! the nearest encoded location; it never fails.

use homematch_core::{ResourceBundle, Vector};
use serde::Serialize;
use tracing::debug;

/// How a location was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// City matched a known city ignoring case
    Exact,
    /// City is a substring of a known city
    Substring,
    /// Nearest encoded location in the catalog
    Nearest,
    /// No city given; state passed through
    Passthrough,
    /// Nothing could be resolved
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub method: ResolutionMethod,
}

impl ResolvedLocation {
    fn unresolved() -> Self {
        Self {
            city: None,
            state: None,
            method: ResolutionMethod::Unresolved,
        }
    }
}

pub struct LocationResolver<'a> {
    resources: &'a ResourceBundle,
    neighbors: usize,
}

impl<'a> LocationResolver<'a> {
    pub fn new(resources: &'a ResourceBundle, neighbors: usize) -> Self {
        Self {
            resources,
            neighbors: neighbors.max(1),
        }
    }

    pub fn resolve(&self, city: Option<&str>, state: Option<&str>) -> ResolvedLocation {
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let known_state = state.and_then(|s| self.known_state(s));
        let passed_state = known_state.or(state).map(str::to_string);

        let city = match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => c,
            None => {
                return ResolvedLocation {
                    city: None,
                    state: passed_state,
                    method: ResolutionMethod::Passthrough,
                }
            }
        };

        let catalog = self.resources.catalog();

        if let Some(canonical) = catalog.city_encoder().canonical(city) {
            debug!("Location '{}' resolved by exact match", city);
            return ResolvedLocation {
                city: Some(canonical.to_string()),
                state: passed_state,
                method: ResolutionMethod::Exact,
            };
        }

        let needle = city.to_lowercase();
        if let Some(found) = catalog
            .cities()
            .iter()
            .find(|known| known.to_lowercase().contains(&needle))
        {
            debug!("Location '{}' resolved by substring match to '{}'", city, found);
            return ResolvedLocation {
                city: Some(found.clone()),
                state: passed_state,
                method: ResolutionMethod::Substring,
            };
        }

        match self.nearest(known_state) {
            Some(resolved) => {
                debug!(
                    "Location '{}' resolved to nearest encoded location {:?}, {:?}",
                    city, resolved.city, resolved.state
                );
                resolved
            }
            None => {
                debug!("Location '{}' could not be resolved", city);
                ResolvedLocation::unresolved()
            }
        }
    }

    /// Canonical name of a known state, accepting postal abbreviations
    fn known_state(&self, state: &str) -> Option<&'a str> {
        let encoder = self.resources.catalog().state_encoder();
        encoder
            .canonical(state)
            .or_else(|| state_from_abbreviation(state).and_then(|full| encoder.canonical(full)))
    }

    /// Row nearest to the mean encoded location of the state (or of the
    /// whole catalog when the state is unknown)
    fn nearest(&self, state: Option<&str>) -> Option<ResolvedLocation> {
        let catalog = self.resources.catalog();
        let state_code = state.and_then(|s| catalog.state_encoder().encode(s));

        let points: Vec<Vector> = catalog
            .listings()
            .iter()
            .filter(|l| state_code.map_or(true, |code| l.state_code == code))
            .map(|l| l.location_point())
            .collect();
        let center = Vector::mean(&points)?;

        let neighbors = self
            .resources
            .location_index()
            .kneighbors(&center, self.neighbors)
            .ok()?;
        let nearest = catalog.get(neighbors.first()?.index as u64)?;

        Some(ResolvedLocation {
            city: Some(nearest.city.clone()),
            state: Some(nearest.state.clone()),
            method: ResolutionMethod::Nearest,
        })
    }
}

const STATE_ABBREVIATIONS: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

fn state_from_abbreviation(abbr: &str) -> Option<&'static str> {
    if abbr.len() != 2 {
        return None;
    }
    STATE_ABBREVIATIONS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbr))
        .map(|(_, name)| *name)
}
