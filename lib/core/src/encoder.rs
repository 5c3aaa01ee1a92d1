//! Categorical label encoding
//!
//! Maps an observed categorical domain (city names, state names) onto the dense
//! integer range `[0, k)`. Classes are sorted before codes are assigned, so the
//! same domain always yields the same codes regardless of row order.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Code used when a category must be encoded but is unknown
pub const SENTINEL_CODE: u32 = 0;

/// Bijection between category labels and dense integer codes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoricalEncoder {
    classes: Vec<String>,
    index: AHashMap<String, u32>,
}

impl CategoricalEncoder {
    /// Fit over every observed label. Duplicates are collapsed.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = labels
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self::from(classes)
    }

    /// Number of known classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code for an exact label, `None` if unseen
    pub fn encode(&self, label: &str) -> Option<u32> {
        self.index.get(label).copied()
    }

    /// Code for an exact label, [`SENTINEL_CODE`] if unseen
    pub fn encode_or_sentinel(&self, label: &str) -> u32 {
        self.encode(label).unwrap_or(SENTINEL_CODE)
    }

    /// Label for a code
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Canonical spelling of a label, compared case-insensitively
    pub fn canonical(&self, label: &str) -> Option<&str> {
        if let Some(code) = self.encode(label) {
            return self.decode(code);
        }
        self.classes
            .iter()
            .find(|c| c.eq_ignore_ascii_case(label))
            .map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl From<Vec<String>> for CategoricalEncoder {
    fn from(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i as u32))
            .collect();
        Self { classes, index }
    }
}

impl From<CategoricalEncoder> for Vec<String> {
    fn from(encoder: CategoricalEncoder) -> Self {
        encoder.classes
    }
}
