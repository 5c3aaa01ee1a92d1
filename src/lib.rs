//! # homematch
//!
//! Conversational property search: a free-text request such as
//! "3 bedroom house in Austin under $400,000" is turned into structured
//! constraints, matched against a listing catalog with progressive
//! relaxation, and ranked by similarity.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! homematch train --dataset listings.json --artifacts ./artifacts
//! homematch serve --artifacts ./artifacts --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use homematch::prelude::*;
//!
//! let rows = vec![RawListing {
//!     price: Some(300_000.0),
//!     bed: Some(3.0),
//!     bath: Some(2.0),
//!     house_size: Some(1500.0),
//!     city: Some("Austin".to_string()),
//!     state: Some("Texas".to_string()),
//! }];
//! let bundle = ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap();
//!
//! let engine = MatchEngine::new(MatchConfig::default());
//! let response = engine.search(&bundle, "3 bed in Austin under $400,000");
//! println!("{}", response.reply(3));
//! ```
//!
//! ## Crate Structure
//!
//! - `homematch-core` - Catalog, encoders, scaler, nearest-neighbor index, resource bundle
//! - `homematch-matching` - Extraction, location resolution, relaxation, ranking
//! - `homematch-storage` - Dataset loading and checksummed artifacts
//! - `homematch-api` - HTTP chat API

// Re-export core types
pub use homematch_core::{
    Catalog, CategoricalEncoder, Error, FeatureScaler, Listing, NearestNeighbors, RawListing,
    ResourceBundle, Result, SharedResources, Vector,
};

// Re-export matching
pub use homematch_matching::{
    ConstraintExtractor, ConstraintSet, MatchConfig, MatchEngine, MatchResponse, MatchStatus,
    MatchTier, PatternExtractor,
};

// Re-export storage
pub use homematch_storage::{load_dataset, ArtifactStore};

// Re-export API
pub use homematch_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, Catalog, ConstraintSet, Error, MatchConfig, MatchEngine, MatchResponse,
        MatchStatus, MatchTier, RawListing, ResourceBundle, Result, SharedResources,
    };
}
