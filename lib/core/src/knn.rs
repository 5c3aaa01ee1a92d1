use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;

/// A neighbor returned by [`NearestNeighbors::kneighbors`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the point in the fitted set
    pub index: usize,
    /// Euclidean distance to the query
    pub distance: f64,
}

/// Exact nearest-neighbor index using linear Euclidean search.
///
/// Fitting only takes ownership of the points; every query scans all of
/// them. Ties are broken by insertion order.
#[derive(Debug, Clone)]
pub struct NearestNeighbors {
    points: Vec<Vector>,
    dim: usize,
}

impl NearestNeighbors {
    pub fn fit(points: Vec<Vector>) -> Result<Self> {
        let dim = points
            .first()
            .map(Vector::dim)
            .ok_or_else(|| Error::InsufficientData("cannot fit index on zero points".to_string()))?;

        if let Some(bad) = points.iter().find(|p| p.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }

        Ok(Self { points, dim })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `k` nearest points to `query`, closest first.
    ///
    /// `k` is capped at the number of fitted points.
    pub fn kneighbors(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let k = k.min(self.points.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(OrderedFloat<f64>, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (OrderedFloat(p.l2_distance_squared(query)), i))
            .collect();

        if k < scored.len() {
            scored.select_nth_unstable(k - 1);
            scored.truncate(k);
        }
        scored.sort_unstable();

        Ok(scored
            .into_iter()
            .map(|(d, index)| Neighbor {
                index,
                distance: d.into_inner().sqrt(),
            })
            .collect())
    }
}
