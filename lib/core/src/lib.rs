//! # homematch Core
//!
//! Core data structures for the homematch property matching engine.
//!
//! This crate provides the fitted, read-only resources the engine works on:
//!
//! - [`Listing`] - A cleaned catalog row with encoded location codes
//! - [`Catalog`] - The immutable reference catalog
//! - [`CategoricalEncoder`] - Label encoding for city and state names
//! - [`FeatureScaler`] - Per-feature standardization
//! - [`NearestNeighbors`] - Exact Euclidean nearest-neighbor search
//! - [`ResourceBundle`] - Everything above, assembled once and shared
//!
//! ## Example
//!
//! ```rust
//! use homematch_core::{Catalog, RawListing, ResourceBundle};
//!
//! let rows = vec![RawListing {
//!     price: Some(300_000.0),
//!     bed: Some(3.0),
//!     bath: Some(2.0),
//!     house_size: Some(1500.0),
//!     city: Some("Austin".to_string()),
//!     state: Some("Texas".to_string()),
//! }];
//!
//! let catalog = Catalog::from_raw(&rows).unwrap();
//! let bundle = ResourceBundle::fit(catalog).unwrap();
//! assert_eq!(bundle.catalog().len(), 1);
//! ```

pub mod bundle;
pub mod catalog;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod knn;
pub mod listing;
pub mod scaler;
pub mod vector;

pub use bundle::{ResourceBundle, SharedResources};
pub use catalog::Catalog;
pub use encoder::{CategoricalEncoder, SENTINEL_CODE};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, ListingFilter, NumericField};
pub use knn::{NearestNeighbors, Neighbor};
pub use listing::{CleanListing, Listing, RawListing, FEATURE_DIM, FEATURE_NAMES};
pub use scaler::FeatureScaler;
pub use vector::Vector;
