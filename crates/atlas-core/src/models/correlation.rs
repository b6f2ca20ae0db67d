use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, DimensionScores};
use super::reason::CorrelationReason;
use crate::errors::{AtlasError, AtlasResult, StorageError};

/// Strategy that produced a pair's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMethod {
    Comprehensive,
    Momentum,
    GeographyOnly,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 3] = [
        CalculationMethod::Comprehensive,
        CalculationMethod::Momentum,
        CalculationMethod::GeographyOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::Comprehensive => "COMPREHENSIVE",
            CalculationMethod::Momentum => "MOMENTUM",
            CalculationMethod::GeographyOnly => "GEOGRAPHY_ONLY",
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculationMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                StorageError::MalformedRow {
                    table: "correlation_pairs".to_string(),
                    reason: format!("unknown calculation method '{s}'"),
                }
                .into()
            })
    }
}

/// Canonical key for an unordered province pair: `source < target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    source: String,
    target: String,
}

impl PairKey {
    /// Build a canonical key from two codes in any order.
    pub fn new(a: &str, b: &str) -> AtlasResult<Self> {
        let (a, b) = (a.trim(), b.trim());
        if a.is_empty() || b.is_empty() || a == b {
            return Err(AtlasError::InvalidPair {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        let (source, target) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn contains(&self, code: &str) -> bool {
        self.source == code || self.target == code
    }

    /// The province on the other side of `code`, if `code` is in the pair.
    pub fn other(&self, code: &str) -> Option<&str> {
        if self.source == code {
            Some(&self.target)
        } else if self.target == code {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// The persisted result of correlating one province pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub key: PairKey,
    /// Overall score in [0, 1], rounded to six places.
    pub score: f64,
    pub method: CalculationMethod,
    pub dimensions: DimensionScores,
    /// Weights of the profile that produced `score`.
    pub weights: BTreeMap<Dimension, f64>,
    pub reason: CorrelationReason,
    pub joint_record_count: usize,
    pub source_record_count: usize,
    pub target_record_count: usize,
    pub total_amount: f64,
    pub distance_km: Option<u32>,
    pub related_record_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CorrelationPair {
    pub fn source(&self) -> &str {
        self.key.source()
    }

    pub fn target(&self) -> &str {
        self.key.target()
    }
}
