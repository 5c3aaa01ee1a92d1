//! Shared, read-only resources for query serving
//!
//! A [`ResourceBundle`] is built once by [`ResourceBundle::fit`] or
//! [`ResourceBundle::from_parts`] and never mutated afterwards. Requests hold
//! it through an `Arc`; [`SharedResources`] swaps in a new bundle on reload
//! while in-flight requests keep the snapshot they started with.

use crate::{Catalog, Error, FeatureScaler, NearestNeighbors, Result, Vector, FEATURE_DIM};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Catalog plus every fitted artifact the engine reads
#[derive(Debug)]
pub struct ResourceBundle {
    catalog: Catalog,
    scaler: FeatureScaler,
    /// Normalized catalog features, indexed by listing id
    normalized: Vec<Vector>,
    /// Index over (city_code, state_code) of every listing
    location_index: NearestNeighbors,
}

impl ResourceBundle {
    /// Fit the feature scaler over the catalog and build the derived indexes
    pub fn fit(catalog: Catalog) -> Result<Self> {
        let features: Vec<Vector> = catalog.listings().iter().map(|l| l.features()).collect();
        let scaler = FeatureScaler::fit(&features)?;
        info!("Fitted feature scaler over {} listings", features.len());
        Self::assemble(catalog, scaler, &features)
    }

    /// Build from a catalog and a previously fitted scaler
    pub fn from_parts(catalog: Catalog, scaler: FeatureScaler) -> Result<Self> {
        if scaler.dim() != FEATURE_DIM {
            return Err(Error::InvalidDimension {
                expected: FEATURE_DIM,
                actual: scaler.dim(),
            });
        }
        let features: Vec<Vector> = catalog.listings().iter().map(|l| l.features()).collect();
        Self::assemble(catalog, scaler, &features)
    }

    fn assemble(catalog: Catalog, scaler: FeatureScaler, features: &[Vector]) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::InsufficientData("catalog is empty".to_string()));
        }

        let normalized = scaler.transform_matrix(features)?;
        let location_index =
            NearestNeighbors::fit(catalog.listings().iter().map(|l| l.location_point()).collect())?;

        Ok(Self {
            catalog,
            scaler,
            normalized,
            location_index,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn location_index(&self) -> &NearestNeighbors {
        &self.location_index
    }

    /// Normalized feature vector of a listing
    pub fn normalized(&self, id: u64) -> Option<&Vector> {
        self.normalized.get(id as usize)
    }
}

/// Versioned pointer to the current [`ResourceBundle`]
pub struct SharedResources {
    current: RwLock<Arc<ResourceBundle>>,
    version: AtomicU64,
}

impl SharedResources {
    pub fn new(bundle: ResourceBundle) -> Self {
        Self {
            current: RwLock::new(Arc::new(bundle)),
            version: AtomicU64::new(1),
        }
    }

    /// The bundle to use for one whole request
    pub fn snapshot(&self) -> Arc<ResourceBundle> {
        self.current.read().clone()
    }

    /// Swap in a new bundle and return the new version
    pub fn replace(&self, bundle: ResourceBundle) -> u64 {
        let listings = bundle.catalog().len();
        *self.current.write() = Arc::new(bundle);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        info!("Resources replaced: version {} with {} listings", version, listings);
        version
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
