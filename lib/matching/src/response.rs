//! Output structures for match results
//!
//! Everything the engine returns is serializable, so the HTTP layer can pass
//! a [`MatchResponse`] straight through.

use crate::constraints::ConstraintSet;
use crate::location::ResolvedLocation;
use crate::rank::RankedListing;
use crate::relax::MatchTier;
use homematch_core::Listing;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Results matched the constraints, possibly after relaxation
    Success,
    /// Nothing matched; fallback listings only
    Partial,
    Error,
}

/// A listing as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub id: u64,
    pub price: f64,
    pub bed: u32,
    pub bath: u32,
    pub house_size: f64,
    pub city: String,
    pub state: String,
}

impl From<&Listing> for PropertyRecord {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id,
            price: l.price,
            bed: l.bed,
            bath: l.bath,
            house_size: l.house_size,
            city: l.city.clone(),
            state: l.state.clone(),
        }
    }
}

impl PropertyRecord {
    /// One-line summary, e.g. `3 bed, 2 bath, 1,500 sqft in Austin, Texas for $300,000`
    pub fn summary(&self) -> String {
        format!(
            "{} bed, {} bath, {} sqft in {}, {} for ${}",
            self.bed,
            self.bath,
            group_thousands(self.house_size),
            self.city,
            self.state,
            group_thousands(self.price)
        )
    }
}

/// Result of a match query
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub status: MatchStatus,
    pub properties: Vec<PropertyRecord>,
    /// Distances aligned with `properties`; absent for fallback results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<f64>>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MatchTier>,
    /// Sanitized constraints the query ran with
    pub constraints: ConstraintSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResolvedLocation>,
}

impl MatchResponse {
    /// Build from ranked results of an exact or relaxed round
    pub fn ranked(
        ranked: &[RankedListing<'_>],
        tier: MatchTier,
        constraints: ConstraintSet,
        location: ResolvedLocation,
    ) -> Self {
        let message = match tier {
            MatchTier::Exact => format!("Found {} matching properties", ranked.len()),
            _ => format!(
                "Found {} properties after relaxing bedroom and price constraints",
                ranked.len()
            ),
        };
        Self {
            status: MatchStatus::Success,
            properties: ranked.iter().map(|r| PropertyRecord::from(r.listing)).collect(),
            distances: Some(ranked.iter().map(|r| r.distance).collect()),
            message,
            tier: Some(tier),
            constraints,
            location: Some(location),
        }
    }

    /// Build from the fallback listings
    pub fn fallback(
        listings: &[&Listing],
        constraints: ConstraintSet,
        location: ResolvedLocation,
    ) -> Self {
        Self {
            status: MatchStatus::Partial,
            properties: listings.iter().map(|l| PropertyRecord::from(*l)).collect(),
            distances: None,
            message: "No exact matches found. Here are some affordable options".to_string(),
            tier: Some(MatchTier::Fallback),
            constraints,
            location: Some(location),
        }
    }

    pub fn error(message: impl Into<String>, constraints: ConstraintSet) -> Self {
        Self {
            status: MatchStatus::Error,
            properties: Vec::new(),
            distances: None,
            message: message.into(),
            tier: None,
            constraints,
            location: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == MatchStatus::Error
    }

    /// Human-readable reply listing at most `limit` properties
    pub fn reply(&self, limit: usize) -> String {
        if self.is_error() {
            return format!("Sorry, something went wrong: {}", self.message);
        }
        if self.properties.is_empty() {
            return "I couldn't find any properties for that request.".to_string();
        }

        let header = match self.status {
            MatchStatus::Partial => {
                "I couldn't find an exact match, but here are some affordable options:"
            }
            _ => "Here are some properties that match your request:",
        };
        let mut reply = header.to_string();
        for property in self.properties.iter().take(limit) {
            reply.push_str("\n- ");
            reply.push_str(&property.summary());
        }
        reply
    }
}

/// Round to a whole number and group digits with commas
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
