//! The match pipeline: extract, sanitize, resolve, filter, rank

use crate::config::MatchConfig;
use crate::constraints::ConstraintSet;
use crate::extract::{ConstraintExtractor, PatternExtractor};
use crate::rank::SimilarityRanker;
use crate::relax::{filter_candidates, MatchTier, Preferences};
use crate::response::MatchResponse;
use homematch_core::ResourceBundle;
use tracing::{debug, error};

/// Runs queries against a [`ResourceBundle`].
///
/// The engine holds no catalog state of its own; the same engine can serve
/// any number of bundles, and a bundle can be shared by many engines.
pub struct MatchEngine {
    extractor: Box<dyn ConstraintExtractor>,
    config: MatchConfig,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self::with_extractor(config, Box::new(PatternExtractor::new()))
    }

    pub fn with_extractor(config: MatchConfig, extractor: Box<dyn ConstraintExtractor>) -> Self {
        Self { extractor, config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Answer a free-text query
    pub fn search(&self, resources: &ResourceBundle, utterance: &str) -> MatchResponse {
        let constraints = self.extractor.extract(utterance);
        debug!("Extracted constraints from '{}': {:?}", utterance, constraints);
        self.search_constraints(resources, constraints)
    }

    /// Answer a structured query
    pub fn search_constraints(
        &self,
        resources: &ResourceBundle,
        constraints: ConstraintSet,
    ) -> MatchResponse {
        let (constraints, _discarded) = constraints.sanitized();
        let prefs = Preferences::resolve(&constraints, resources, &self.config);
        debug!("Resolved preferences: {:?}", prefs);

        let candidates = filter_candidates(resources.catalog(), &prefs, &self.config);

        if candidates.tier == MatchTier::Fallback {
            return MatchResponse::fallback(&candidates.listings, constraints, prefs.location);
        }

        let ranker = SimilarityRanker::new(resources);
        match ranker.rank(&candidates.listings, &prefs, self.config.top_k) {
            Ok(ranked) => {
                MatchResponse::ranked(&ranked, candidates.tier, constraints, prefs.location)
            }
            Err(e) => {
                error!("Ranking failed: {}", e);
                MatchResponse::error(format!("Ranking failed: {}", e), constraints)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::MatchStatus;
    use homematch_core::{Catalog, RawListing};

    fn row(price: f64, bed: f64, city: &str, state: &str) -> RawListing {
        RawListing {
            price: Some(price),
            bed: Some(bed),
            bath: Some(2.0),
            house_size: Some(1500.0),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
        }
    }

    fn austin() -> ResourceBundle {
        let rows = vec![
            row(300_000.0, 3.0, "Austin", "Texas"),
            row(250_000.0, 2.0, "Austin", "Texas"),
        ];
        ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap()
    }

    #[test]
    fn test_exact_match_in_austin() {
        let b = austin();
        let response = MatchEngine::default().search(&b, "3 bedroom house in Austin under $400000");

        assert_eq!(response.status, MatchStatus::Success);
        assert_eq!(response.tier, Some(MatchTier::Exact));
        assert_eq!(response.properties.len(), 1);
        assert_eq!(response.properties[0].bed, 3);
        assert_eq!(response.distances.as_ref().map(Vec::len), Some(1));
        assert_eq!(response.constraints.city.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_unsatisfiable_falls_back() {
        let rows: Vec<RawListing> = (0..8)
            .map(|i| row(500_000.0 + i as f64 * 10_000.0, 1.0, "Dallas", "Texas"))
            .collect();
        let b = ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap();

        let response = MatchEngine::default().search(&b, "6 bedroom home under $100,000");
        assert_eq!(response.status, MatchStatus::Partial);
        assert_eq!(response.tier, Some(MatchTier::Fallback));
        assert!(response.distances.is_none());
        assert_eq!(response.properties.len(), 5);
        assert_eq!(response.properties[0].price, 500_000.0);
    }

    #[test]
    fn test_location_after_leading_in_phrase() {
        let rows = vec![
            row(300_000.0, 3.0, "Austin", "Texas"),
            row(200_000.0, 3.0, "Dallas", "Texas"),
        ];
        let b = ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap();
        let response =
            MatchEngine::default().search(&b, "I'm interested in a house in Austin under $400,000");

        let location = response.location.unwrap();
        assert_eq!(location.city.as_deref(), Some("Austin"));
        assert!(response.properties.iter().all(|p| p.city == "Austin"));
    }

    #[test]
    fn test_greeting_uses_defaults() {
        let b = austin();
        let response = MatchEngine::default().search(&b, "hello");
        assert!(response.constraints.is_empty());
        assert_ne!(response.status, MatchStatus::Error);
        assert!(!response.properties.is_empty());
    }

    #[test]
    fn test_top_k_from_config() {
        let rows: Vec<RawListing> = (0..10)
            .map(|i| row(100_000.0 + i as f64 * 1000.0, 3.0, "Austin", "Texas"))
            .collect();
        let b = ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap();
        let engine = MatchEngine::new(MatchConfig { top_k: 2, ..Default::default() });

        let response = engine.search(&b, "3 bed under $200,000");
        assert_eq!(response.properties.len(), 2);
    }

    #[test]
    fn test_structured_query_sanitizes() {
        let b = austin();
        let constraints = ConstraintSet {
            bed: Some(3),
            price: Some(-1.0),
            ..Default::default()
        };
        let response = MatchEngine::default().search_constraints(&b, constraints);
        assert_eq!(response.constraints.price, None);
        assert_eq!(response.status, MatchStatus::Success);
    }

    struct FixedExtractor(ConstraintSet);

    impl ConstraintExtractor for FixedExtractor {
        fn extract(&self, _utterance: &str) -> ConstraintSet {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_extractor() {
        let b = austin();
        let fixed = ConstraintSet { bed: Some(2), ..Default::default() };
        let engine = MatchEngine::with_extractor(MatchConfig::default(), Box::new(FixedExtractor(fixed)));
        let response = engine.search(&b, "anything");
        assert_eq!(response.constraints.bed, Some(2));
    }
}
