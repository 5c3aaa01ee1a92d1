//! Engine configuration
//!
//! Tunables for relaxation, defaults and result sizes. Every field has a
//! default, so a JSON config file only needs the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a [`MatchEngine`](crate::MatchEngine)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of ranked results to return
    pub top_k: usize,

    /// Number of relaxation rounds before falling back
    pub max_rounds: usize,

    /// Fraction of the requested price added to the ceiling per round
    pub price_step: f64,

    /// Lowest bedroom minimum a relaxed round can reach
    pub min_bed_floor: u32,

    /// Bedroom count assumed when the query has none
    pub default_bed: u32,

    /// Bathroom count assumed when the query has none
    pub default_bath: u32,

    /// Number of cheapest listings returned by the fallback
    pub fallback_count: usize,

    /// Neighbors fetched by the location fallback (only the nearest is used)
    pub location_neighbors: usize,

    /// Properties listed in a chat reply
    pub reply_limit: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_rounds: 3,
            price_step: 0.5,
            min_bed_floor: 1,
            default_bed: 3,
            default_bath: 2,
            fallback_count: 5,
            location_neighbors: 3,
            reply_limit: 3,
        }
    }
}

impl MatchConfig {
    /// Load a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let config: MatchConfig =
            serde_json::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be at least 1".to_string()));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid("max_rounds must be at least 1".to_string()));
        }
        if !self.price_step.is_finite() || self.price_step < 0.0 {
            return Err(ConfigError::Invalid(
                "price_step must be a non-negative number".to_string(),
            ));
        }
        if self.location_neighbors == 0 {
            return Err(ConfigError::Invalid(
                "location_neighbors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur while loading or validating a config
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{0}': {1}")]
    Read(String, String),

    #[error("Cannot parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for homematch_core::Error {
    fn from(err: ConfigError) -> Self {
        homematch_core::Error::InvalidConfig(err.to_string())
    }
}
