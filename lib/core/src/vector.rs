use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A dense feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Squared L2 distance. Mismatched dimensions are infinitely far apart.
    #[inline]
    pub fn l2_distance_squared(&self, other: &Vector) -> f64 {
        if self.dim() != other.dim() {
            return f64::INFINITY;
        }

        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| {
                let d = a - b;
                d * d
            })
            .sum()
    }

    /// Compute L2 (Euclidean) distance
    #[inline]
    pub fn l2_distance(&self, other: &Vector) -> f64 {
        self.l2_distance_squared(other).sqrt()
    }

    /// Component-wise mean of a set of equally sized vectors.
    ///
    /// Returns `None` for an empty set or mixed dimensions.
    pub fn mean<'a, I>(vectors: I) -> Option<Vector>
    where
        I: IntoIterator<Item = &'a Vector>,
    {
        let mut iter = vectors.into_iter();
        let first = iter.next()?;
        let mut sum = first.data.clone();
        let mut count = 1usize;

        for v in iter {
            if v.dim() != sum.len() {
                return None;
            }
            for (acc, x) in sum.iter_mut().zip(v.data.iter()) {
                *acc += x;
            }
            count += 1;
        }

        let n = count as f64;
        for acc in &mut sum {
            *acc /= n;
        }
        Some(Vector::new(sum))
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_distance() {
        let v1 = Vector::new(vec![0.0, 0.0]);
        let v2 = Vector::new(vec![3.0, 4.0]);
        assert!((v1.l2_distance(&v2) - 5.0).abs() < 1e-9);
        assert!((v1.l2_distance_squared(&v2) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_l2_distance_dimension_mismatch() {
        let v1 = Vector::new(vec![0.0, 0.0]);
        let v2 = Vector::new(vec![1.0]);
        assert!(v1.l2_distance(&v2).is_infinite());
    }

    #[test]
    fn test_mean() {
        let vs = vec![
            Vector::new(vec![1.0, 2.0]),
            Vector::new(vec![3.0, 6.0]),
        ];
        let mean = Vector::mean(&vs).unwrap();
        assert_eq!(mean.as_slice(), &[2.0, 4.0]);

        let empty: Vec<Vector> = Vec::new();
        assert!(Vector::mean(&empty).is_none());
    }
}
