// Listing filters used by the relaxation rounds
use crate::Listing;

pub trait Filter {
    fn matches(&self, listing: &Listing) -> bool;
}

/// Numeric listing attribute a condition can compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Price,
    Bed,
    Bath,
    HouseSize,
}

impl NumericField {
    fn value(self, listing: &Listing) -> f64 {
        match self {
            NumericField::Price => listing.price,
            NumericField::Bed => listing.bed as f64,
            NumericField::Bath => listing.bath as f64,
            NumericField::HouseSize => listing.house_size,
        }
    }
}

pub struct ListingFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    GreaterEqual { field: NumericField, value: f64 },
    LessEqual { field: NumericField, value: f64 },
    CityCode(u32),
    StateCode(u32),
    And(Vec<FilterCondition>),
}

impl ListingFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, listing: &Listing) -> bool {
        match condition {
            FilterCondition::GreaterEqual { field, value } => field.value(listing) >= *value,
            FilterCondition::LessEqual { field, value } => field.value(listing) <= *value,
            FilterCondition::CityCode(code) => listing.city_code == *code,
            FilterCondition::StateCode(code) => listing.state_code == *code,
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, listing))
            }
        }
    }
}

impl Filter for ListingFilter {
    fn matches(&self, listing: &Listing) -> bool {
        Self::matches_condition(&self.condition, listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64, bed: u32, city_code: u32) -> Listing {
        Listing {
            id: 0,
            price,
            bed,
            bath: 2,
            house_size: 1200.0,
            city: "Austin".to_string(),
            state: "Texas".to_string(),
            city_code,
            state_code: 1,
        }
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let l = listing(400_000.0, 3, 0);
        let filter = ListingFilter::new(FilterCondition::And(vec![
            FilterCondition::GreaterEqual { field: NumericField::Bed, value: 3.0 },
            FilterCondition::LessEqual { field: NumericField::Price, value: 400_000.0 },
        ]));
        assert!(filter.matches(&l));
    }

    #[test]
    fn test_location_codes() {
        let l = listing(100.0, 1, 5);
        assert!(ListingFilter::new(FilterCondition::CityCode(5)).matches(&l));
        assert!(!ListingFilter::new(FilterCondition::CityCode(4)).matches(&l));
        assert!(ListingFilter::new(FilterCondition::StateCode(1)).matches(&l));
    }

    #[test]
    fn test_and_requires_every_condition() {
        let l = listing(100.0, 1, 5);
        let filter = ListingFilter::new(FilterCondition::And(vec![
            FilterCondition::CityCode(5),
            FilterCondition::GreaterEqual {
                field: NumericField::Bed,
                value: 2.0,
            },
        ]));
        assert!(!filter.matches(&l));
    }

    #[test]
    fn test_empty_and_matches_everything() {
        let l = listing(100.0, 1, 5);
        assert!(ListingFilter::new(FilterCondition::And(Vec::new())).matches(&l));
    }
}
