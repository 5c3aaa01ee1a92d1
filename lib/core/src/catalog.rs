use crate::encoder::CategoricalEncoder;
use crate::filter::Filter;
use crate::listing::{Listing, RawListing};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The cleaned, immutable reference catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    listings: Vec<Listing>,
    city_encoder: CategoricalEncoder,
    state_encoder: CategoricalEncoder,
    /// Distinct city names in order of first appearance
    city_order: Vec<String>,
    median_price: f64,
    median_house_size: f64,
}

impl Catalog {
    /// Clean raw rows, fit the city/state encoders and assign codes.
    ///
    /// Rows with a missing field, a negative or non-finite number, or a
    /// non-positive price are dropped for good.
    pub fn from_raw(rows: &[RawListing]) -> Result<Self> {
        let cleaned: Vec<_> = rows.iter().filter_map(RawListing::clean).collect();
        let dropped = rows.len() - cleaned.len();
        if dropped > 0 {
            warn!("Dropped {} of {} raw rows during cleaning", dropped, rows.len());
        }

        if cleaned.is_empty() {
            return Err(Error::InsufficientData(
                "no valid listings after cleaning".to_string(),
            ));
        }

        let city_encoder = CategoricalEncoder::fit(cleaned.iter().map(|c| c.city.as_str()));
        let state_encoder = CategoricalEncoder::fit(cleaned.iter().map(|c| c.state.as_str()));

        let listings = cleaned
            .into_iter()
            .enumerate()
            .map(|(i, c)| Listing {
                id: i as u64,
                city_code: city_encoder.encode_or_sentinel(&c.city),
                state_code: state_encoder.encode_or_sentinel(&c.state),
                price: c.price,
                bed: c.bed,
                bath: c.bath,
                house_size: c.house_size,
                city: c.city,
                state: c.state,
            })
            .collect();

        Self::new(listings, city_encoder, state_encoder)
    }

    /// Assemble a catalog from already encoded listings.
    ///
    /// Listing ids are reassigned to catalog positions.
    pub fn new(
        mut listings: Vec<Listing>,
        city_encoder: CategoricalEncoder,
        state_encoder: CategoricalEncoder,
    ) -> Result<Self> {
        if listings.is_empty() {
            return Err(Error::InsufficientData("catalog is empty".to_string()));
        }

        for (i, listing) in listings.iter_mut().enumerate() {
            listing.id = i as u64;
            if listing.price.is_nan() || listing.price <= 0.0 {
                return Err(Error::InsufficientData(format!(
                    "listing {} has non-positive price {}",
                    i, listing.price
                )));
            }
        }

        let city_order = {
            let mut seen = HashSet::new();
            listings
                .iter()
                .filter(|l| seen.insert(l.city.as_str()))
                .map(|l| l.city.clone())
                .collect()
        };

        let median_price = median(listings.iter().map(|l| l.price).collect());
        let median_house_size = median(listings.iter().map(|l| l.house_size).collect());

        debug!(
            "Catalog built: {} listings, {} cities, {} states",
            listings.len(),
            city_encoder.len(),
            state_encoder.len()
        );

        Ok(Self {
            listings,
            city_encoder,
            state_encoder,
            city_order,
            median_price,
            median_house_size,
        })
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.get(id as usize)
    }

    pub fn city_encoder(&self) -> &CategoricalEncoder {
        &self.city_encoder
    }

    pub fn state_encoder(&self) -> &CategoricalEncoder {
        &self.state_encoder
    }

    /// Distinct city names in first-occurrence order
    pub fn cities(&self) -> &[String] {
        &self.city_order
    }

    pub fn median_price(&self) -> f64 {
        self.median_price
    }

    pub fn median_house_size(&self) -> f64 {
        self.median_house_size
    }

    /// Listings matching `filter`, in catalog order
    pub fn filter(&self, filter: &dyn Filter) -> Vec<&Listing> {
        self.listings.iter().filter(|l| filter.matches(l)).collect()
    }

    /// The `n` cheapest listings. Equal prices keep catalog order.
    pub fn cheapest(&self, n: usize) -> Vec<&Listing> {
        let mut by_price: Vec<&Listing> = self.listings.iter().collect();
        by_price.sort_by(|a, b| a.price.total_cmp(&b.price));
        by_price.truncate(n);
        by_price
    }
}

/// Median with the mean of the two middle values for even counts
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterCondition, ListingFilter, NumericField};

    fn raw(price: f64, bed: f64, city: &str, state: &str) -> RawListing {
        RawListing {
            price: Some(price),
            bed: Some(bed),
            bath: Some(2.0),
            house_size: Some(1000.0 + price / 1000.0),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
        }
    }

    fn sample() -> Catalog {
        Catalog::from_raw(&[
            raw(300_000.0, 3.0, "Dallas", "Texas"),
            raw(0.0, 3.0, "Nowhere", "Texas"),
            raw(250_000.0, 2.0, "Austin", "Texas"),
            raw(500_000.0, 4.0, "Boston", "Massachusetts"),
            raw(250_000.0, 1.0, "Dallas", "Texas"),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_raw_drops_invalid_rows() {
        let catalog = sample();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.listings().iter().all(|l| l.price > 0.0));
        // ids follow catalog order after cleaning
        let ids: Vec<u64> = catalog.listings().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_codes_and_city_order() {
        let catalog = sample();
        assert_eq!(catalog.cities(), &["Dallas", "Austin", "Boston"]);
        let austin = &catalog.listings()[1];
        assert_eq!(austin.city_code, catalog.city_encoder().encode("Austin").unwrap());
        assert_eq!(austin.city_code, 0);
    }

    #[test]
    fn test_medians() {
        let catalog = sample();
        // prices 250k, 250k, 300k, 500k
        assert_eq!(catalog.median_price(), 275_000.0);
    }

    #[test]
    fn test_empty_after_cleaning_fails() {
        let err = Catalog::from_raw(&[raw(-1.0, 1.0, "A", "B")]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_cheapest_is_stable() {
        let catalog = sample();
        let cheapest = catalog.cheapest(3);
        let ids: Vec<u64> = cheapest.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3, 0]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let catalog = sample();
        let filter = ListingFilter::new(FilterCondition::LessEqual {
            field: NumericField::Price,
            value: 300_000.0,
        });
        let ids: Vec<u64> = catalog.filter(&filter).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }
}
