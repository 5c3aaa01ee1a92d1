//! Similarity ranking of filtered candidates
//!
//! Candidates are ordered by Euclidean distance to the preference vector in
//! standardized feature space. The neighbor index is fit over the candidate
//! set on every call, so ranking costs O(n log k) per query with no reuse
//! between queries.

use crate::relax::Preferences;
use homematch_core::{Error, Listing, NearestNeighbors, ResourceBundle, Result, Vector};

/// A candidate with its distance to the query
#[derive(Debug, Clone, PartialEq)]
pub struct RankedListing<'a> {
    pub listing: &'a Listing,
    pub distance: f64,
}

/// Ranks candidates against a preference vector
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker<'a> {
    resources: &'a ResourceBundle,
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(resources: &'a ResourceBundle) -> Self {
        Self { resources }
    }

    /// Normalized query vector for a preference
    pub fn query_vector(&self, prefs: &Preferences) -> Result<Vector> {
        let raw = prefs.query_vector(self.resources.catalog());
        self.resources.scaler().transform(&raw)
    }

    /// The `k` candidates nearest to `prefs`, closest first.
    ///
    /// Output length is `min(k, candidates.len())`; equal distances keep the
    /// candidates' input order.
    pub fn rank<'c>(
        &self,
        candidates: &[&'c Listing],
        prefs: &Preferences,
        k: usize,
    ) -> Result<Vec<RankedListing<'c>>> {
        if candidates.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let points = candidates
            .iter()
            .map(|l| {
                self.resources.normalized(l.id).cloned().ok_or_else(|| {
                    Error::InsufficientData(format!("no normalized features for listing {}", l.id))
                })
            })
            .collect::<Result<Vec<Vector>>>()?;

        let index = NearestNeighbors::fit(points)?;
        let query = self.query_vector(prefs)?;

        let ranked = index
            .kneighbors(&query, k)?
            .into_iter()
            .map(|n| RankedListing {
                listing: candidates[n.index],
                distance: n.distance,
            })
            .collect();

        Ok(ranked)
    }
}
