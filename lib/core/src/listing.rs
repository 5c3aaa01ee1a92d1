use serde::{Deserialize, Serialize};
use crate::vector::Vector;

/// Number of numeric features per listing
pub const FEATURE_DIM: usize = 6;

/// Feature column names, in the order produced by [`Listing::features`]
pub const FEATURE_NAMES: [&str; FEATURE_DIM] =
    ["price", "bed", "bath", "house_size", "city_code", "state_code"];

/// A row of the reference catalog.
///
/// Listings are created once when the catalog is built and never mutated
/// afterwards. `id` is the row position in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub price: f64,
    pub bed: u32,
    pub bath: u32,
    pub house_size: f64,
    pub city: String,
    pub state: String,
    pub city_code: u32,
    pub state_code: u32,
}

impl Listing {
    /// Numeric feature vector: price, bed, bath, house_size, city_code, state_code
    #[inline]
    #[must_use]
    pub fn features(&self) -> Vector {
        Vector::new(vec![
            self.price,
            self.bed as f64,
            self.bath as f64,
            self.house_size,
            self.city_code as f64,
            self.state_code as f64,
        ])
    }

    /// Encoded (city_code, state_code) pair used by location search
    #[inline]
    #[must_use]
    pub fn location_point(&self) -> Vector {
        Vector::new(vec![self.city_code as f64, self.state_code as f64])
    }
}

/// A raw dataset row before cleaning. Any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawListing {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bed: Option<f64>,
    #[serde(default)]
    pub bath: Option<f64>,
    #[serde(default)]
    pub house_size: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A cleaned row that has not been assigned codes yet
#[derive(Debug, Clone, PartialEq)]
pub struct CleanListing {
    pub price: f64,
    pub bed: u32,
    pub bath: u32,
    pub house_size: f64,
    pub city: String,
    pub state: String,
}

impl RawListing {
    /// Validate a raw row.
    ///
    /// Returns `None` when a required field is missing, a numeric field is
    /// negative or non-finite, a room count is fractional, or the price is
    /// not strictly positive.
    pub fn clean(&self) -> Option<CleanListing> {
        let price = self.price.filter(|p| p.is_finite() && *p > 0.0)?;
        let bed = count_field(self.bed)?;
        let bath = count_field(self.bath)?;
        let house_size = self.house_size.filter(|s| s.is_finite() && *s >= 0.0)?;
        let city = non_blank(self.city.as_deref())?;
        let state = non_blank(self.state.as_deref())?;

        Some(CleanListing {
            price,
            bed,
            bath,
            house_size,
            city,
            state,
        })
    }
}

/// Whole, non-negative counts only; a fractional count ("2.5 baths") drops the row
fn count_field(value: Option<f64>) -> Option<u32> {
    let v = value?;
    if !v.is_finite() || v < 0.0 || v > u32::MAX as f64 || v.fract() != 0.0 {
        return None;
    }
    Some(v as u32)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawListing {
        RawListing {
            price: Some(300_000.0),
            bed: Some(3.0),
            bath: Some(2.0),
            house_size: Some(1500.0),
            city: Some("Austin".to_string()),
            state: Some("Texas".to_string()),
        }
    }

    #[test]
    fn test_clean_valid_row() {
        let clean = raw().clean().unwrap();
        assert_eq!(clean.bed, 3);
        assert_eq!(clean.city, "Austin");
    }

    #[test]
    fn test_clean_rejects_non_positive_price() {
        let mut row = raw();
        row.price = Some(0.0);
        assert!(row.clean().is_none());
        row.price = Some(-10.0);
        assert!(row.clean().is_none());
    }

    #[test]
    fn test_clean_rejects_missing_fields() {
        let mut row = raw();
        row.house_size = None;
        assert!(row.clean().is_none());

        let mut row = raw();
        row.city = Some("   ".to_string());
        assert!(row.clean().is_none());
    }

    #[test]
    fn test_clean_rejects_fractional_counts() {
        let mut row = raw();
        row.bath = Some(2.5);
        assert!(row.clean().is_none());

        let mut row = raw();
        row.bed = Some(3.0);
        row.bath = Some(1.0);
        assert_eq!(row.clean().map(|c| c.bath), Some(1));
    }

    #[test]
    fn test_features_order() {
        let listing = Listing {
            id: 0,
            price: 100.0,
            bed: 2,
            bath: 1,
            house_size: 800.0,
            city: "A".to_string(),
            state: "B".to_string(),
            city_code: 4,
            state_code: 7,
        };
        assert_eq!(
            listing.features().as_slice(),
            &[100.0, 2.0, 1.0, 800.0, 4.0, 7.0]
        );
        assert_eq!(listing.location_point().as_slice(), &[4.0, 7.0]);
    }
}
