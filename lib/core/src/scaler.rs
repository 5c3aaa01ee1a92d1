//! Feature normalization
//!
//! A [`FeatureScaler`] is fit once over the catalog feature matrix and then
//! applied unchanged to both catalog rows and query vectors. Refitting per
//! query would make distances depend on the query.

use crate::{Error, Result, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-feature affine transform `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    /// Fit mean and population standard deviation per column.
    ///
    /// Columns with zero spread get a scale of 1.
    pub fn fit(rows: &[Vector]) -> Result<Self> {
        let first = rows.first().ok_or_else(|| {
            Error::InsufficientData("cannot fit scaler on an empty feature matrix".to_string())
        })?;
        let dim = first.dim();
        if dim == 0 {
            return Err(Error::InsufficientData(
                "cannot fit scaler on zero-width rows".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; dim];
        for row in rows {
            if row.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: row.dim(),
                });
            }
            for (m, x) in mean.iter_mut().zip(row.as_slice()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = vec![0.0; dim];
        for row in rows {
            for ((v, x), m) in variance.iter_mut().zip(row.as_slice()).zip(&mean) {
                let d = x - m;
                *v += d * d;
            }
        }

        let scale = variance
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON && std.is_finite() {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Number of features the scaler was fit on
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Normalize a single vector
    pub fn transform(&self, v: &Vector) -> Result<Vector> {
        if v.dim() != self.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: v.dim(),
            });
        }

        Ok(Vector::new(
            v.as_slice()
                .iter()
                .zip(&self.mean)
                .zip(&self.scale)
                .map(|((x, m), s)| (x - m) / s)
                .collect(),
        ))
    }

    /// Normalize a matrix of row vectors in parallel
    pub fn transform_matrix(&self, rows: &[Vector]) -> Result<Vec<Vector>> {
        rows.par_iter().map(|row| self.transform(row)).collect()
    }
}
