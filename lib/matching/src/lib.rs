//! # homematch Matching
//!
//! Turns a conversational property request into ranked catalog listings.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐
//! │ Utterance │──>│  Extract  │──>│  Resolve  │──>│  Filter   │──>│   Rank    │
//! │  (text)   │   │ (regexes) │   │ (location)│   │ (relaxed) │   │  (k-NN)   │
//! └───────────┘   └───────────┘   └───────────┘   └───────────┘   └───────────┘
//! ```
//!
//! - [`PatternExtractor`] pulls bedrooms, bathrooms, a price ceiling and a
//!   location out of free text
//! - [`LocationResolver`] maps the location onto a city/state the catalog knows
//! - [`filter_candidates`] applies the constraints, relaxing bedrooms and price
//!   over several rounds before falling back to the cheapest listings
//! - [`SimilarityRanker`] orders candidates by distance in standardized
//!   feature space
//!
//! ## Example
//!
//! ```rust
//! use homematch_core::{Catalog, RawListing, ResourceBundle};
//! use homematch_matching::{MatchEngine, MatchStatus};
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
//! let response = MatchEngine::default().search(&bundle, "3 bed in Austin under $400,000");
//! assert_eq!(response.status, MatchStatus::Success);
//! ```

pub mod config;
pub mod constraints;
pub mod engine;
pub mod extract;
pub mod location;
pub mod rank;
pub mod relax;
pub mod response;

pub use config::{ConfigError, MatchConfig};
pub use constraints::{ConstraintRequest, ConstraintSet, MAX_ROOMS};
pub use engine::MatchEngine;
pub use extract::{title_case, ConstraintExtractor, PatternExtractor};
pub use location::{LocationResolver, ResolutionMethod, ResolvedLocation};
pub use rank::{RankedListing, SimilarityRanker};
pub use relax::{filter_candidates, round_condition, CandidateSet, MatchTier, Preferences};
pub use response::{group_thousands, MatchResponse, MatchStatus, PropertyRecord};
