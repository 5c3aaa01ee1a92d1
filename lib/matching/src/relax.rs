//! Constraint filtering with progressive relaxation
//!
//! Each round restarts from the full catalog with a lower bedroom minimum
//! and a higher price ceiling than the last. Location constraints are never
//! relaxed. When every round comes back empty the cheapest listings are
//! returned instead.

use crate::config::MatchConfig;
use crate::constraints::ConstraintSet;
use crate::location::{LocationResolver, ResolvedLocation};
use homematch_core::{
    Catalog, FilterCondition, Listing, ListingFilter, NumericField, ResourceBundle, SENTINEL_CODE,
    Vector,
};
use serde::Serialize;
use tracing::debug;

/// How the candidate set was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// First round, thresholds as requested
    Exact,
    /// A later round with loosened thresholds
    Relaxed,
    /// No round matched; cheapest listings instead
    Fallback,
}

/// A full preference: the constraint set with defaults filled in and the
/// location resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preferences {
    pub bed: u32,
    pub bath: u32,
    pub price: f64,
    pub house_size: f64,
    pub location: ResolvedLocation,
}

impl Preferences {
    pub fn resolve(
        constraints: &ConstraintSet,
        resources: &ResourceBundle,
        config: &MatchConfig,
    ) -> Self {
        let catalog = resources.catalog();
        let location = LocationResolver::new(resources, config.location_neighbors)
            .resolve(constraints.city.as_deref(), constraints.state.as_deref());

        Self {
            bed: constraints.bed.unwrap_or(config.default_bed),
            bath: constraints.bath.unwrap_or(config.default_bath),
            price: constraints.price.unwrap_or_else(|| catalog.median_price()),
            house_size: catalog.median_house_size(),
            location,
        }
    }

    pub fn city_code(&self, catalog: &Catalog) -> Option<u32> {
        self.location
            .city
            .as_deref()
            .and_then(|c| catalog.city_encoder().encode(c))
    }

    pub fn state_code(&self, catalog: &Catalog) -> Option<u32> {
        self.location
            .state
            .as_deref()
            .and_then(|s| catalog.state_encoder().encode(s))
    }

    /// Raw query vector in catalog feature order. Unknown locations use the
    /// sentinel code.
    pub fn query_vector(&self, catalog: &Catalog) -> Vector {
        Vector::new(vec![
            self.price,
            self.bed as f64,
            self.bath as f64,
            self.house_size,
            self.city_code(catalog).unwrap_or(SENTINEL_CODE) as f64,
            self.state_code(catalog).unwrap_or(SENTINEL_CODE) as f64,
        ])
    }
}

/// Listings that survived filtering, in catalog order
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    pub listings: Vec<&'a Listing>,
    pub tier: MatchTier,
    /// Round that produced the set; `None` for the fallback
    pub round: Option<usize>,
}

impl<'a> CandidateSet<'a> {
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Filter condition for one relaxation round
pub fn round_condition(
    prefs: &Preferences,
    catalog: &Catalog,
    config: &MatchConfig,
    round: usize,
) -> FilterCondition {
    let relax = u32::try_from(round).unwrap_or(u32::MAX);
    let min_bed = prefs.bed.saturating_sub(relax).max(config.min_bed_floor);
    let max_price = prefs.price * (1.0 + config.price_step * round as f64);

    let mut conditions = vec![
        FilterCondition::GreaterEqual {
            field: NumericField::Bed,
            value: min_bed as f64,
        },
        FilterCondition::LessEqual {
            field: NumericField::Price,
            value: max_price,
        },
    ];

    // An unseen city or state is no constraint at all
    if let Some(code) = prefs.city_code(catalog) {
        conditions.push(FilterCondition::CityCode(code));
    }
    if let Some(code) = prefs.state_code(catalog) {
        conditions.push(FilterCondition::StateCode(code));
    }

    FilterCondition::And(conditions)
}

/// Run the relaxation rounds and fall back to the cheapest listings
pub fn filter_candidates<'a>(
    catalog: &'a Catalog,
    prefs: &Preferences,
    config: &MatchConfig,
) -> CandidateSet<'a> {
    for round in 0..config.max_rounds {
        let filter = ListingFilter::new(round_condition(prefs, catalog, config, round));
        let listings = catalog.filter(&filter);
        debug!("Relaxation round {}: {} candidates", round, listings.len());

        if !listings.is_empty() {
            return CandidateSet {
                listings,
                tier: if round == 0 { MatchTier::Exact } else { MatchTier::Relaxed },
                round: Some(round),
            };
        }
    }

    debug!(
        "No candidates after {} rounds, falling back to {} cheapest listings",
        config.max_rounds, config.fallback_count
    );
    CandidateSet {
        listings: catalog.cheapest(config.fallback_count),
        tier: MatchTier::Fallback,
        round: None,
    }
}
