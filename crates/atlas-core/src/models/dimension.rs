use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AtlasError, ConfigError};

/// One similarity axis between two provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Jaccard over records attributable to each province vs jointly linked ones.
    JointActivity,
    /// Cosine over industry frequency vectors.
    IndustryFrequency,
    /// Jaccard over investment-type labels.
    InvestmentTypeOverlap,
    /// Distance decay.
    Geography,
    /// Log-scaled total amount of joint records.
    Magnitude,
    /// Jaccard over concept/theme tags.
    ConceptOverlap,
    /// Jaccard over company-type buckets.
    CompanyTypeOverlap,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::JointActivity,
        Dimension::IndustryFrequency,
        Dimension::InvestmentTypeOverlap,
        Dimension::Geography,
        Dimension::Magnitude,
        Dimension::ConceptOverlap,
        Dimension::CompanyTypeOverlap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::JointActivity => "joint_activity",
            Dimension::IndustryFrequency => "industry_frequency",
            Dimension::InvestmentTypeOverlap => "investment_type_overlap",
            Dimension::Geography => "geography",
            Dimension::Magnitude => "magnitude",
            Dimension::ConceptOverlap => "concept_overlap",
            Dimension::CompanyTypeOverlap => "company_type_overlap",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| {
                ConfigError::ValidationFailed {
                    field: "profiles".to_string(),
                    message: format!("unknown dimension '{s}'"),
                }
                .into()
            })
    }
}

/// Per-dimension breakdown of a pair's score. Dimensions a strategy did not
/// compute are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores(BTreeMap<Dimension, f64>);

impl DimensionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dimension: Dimension, score: f64) -> Self {
        self.set(dimension, score);
        self
    }

    pub fn set(&mut self, dimension: Dimension, score: f64) {
        self.0.insert(dimension, score);
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(d, s)| (*d, *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Dimension, f64)> for DimensionScores {
    fn from_iter<I: IntoIterator<Item = (Dimension, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
